//! Quality filter prompts.
//!
//! Judgment templates that gate the pipeline: scoring a source context,
//! deciding whether a generated question stands on its own, and deciding
//! whether an evolved question is equivalent to the one it came from. All
//! three answer in JSON and append the schema's format instruction.

use serde_json::json;

use super::template::{Example, Template};
use crate::schema::OutputSchema;

pub const SCORE_CONTEXT: &str = "score_context";
pub const FILTER_QUESTION: &str = "filter_question";
pub const EVOLUTION_ELIMINATION: &str = "evolution_elimination";

pub fn score_context() -> Template {
    Template::new(
        SCORE_CONTEXT,
        r#"Dado un contexto, realiza la siguiente tarea y da la respuesta en formato JSON VÁLIDO: Evalúa el contexto proporcionado y asigna una puntuación numérica de 1 (Bajo), 2 (Medio) o 3 (Alto) para cada uno de los siguientes criterios en tu respuesta JSON:

claridad: Evalúa la precisión y comprensibilidad de la información presentada. Las puntuaciones altas (3) están reservadas para contextos que son precisos en su información y fáciles de entender. Las puntuaciones bajas (1) son para contextos donde la información es vaga o difícil de comprender.
profundidad: Determina el nivel de examen detallado y la inclusión de ideas innovadoras dentro del contexto. Una puntuación alta indica un análisis exhaustivo y perspicaz, mientras que una puntuación baja sugiere un tratamiento superficial del tema.
estructura: Evalúa qué tan bien está organizado el contenido y si fluye lógicamente. Las puntuaciones altas se otorgan a contextos que demuestran una organización coherente y una progresión lógica, mientras que las puntuaciones bajas indican una falta de estructura o claridad en la progresión.
relevancia: Juzga la pertinencia del contenido al tema principal, otorgando puntuaciones altas a contextos enfocados estrictamente en el tema sin digresiones innecesarias, y puntuaciones bajas a aquellos que están desordenados con información irrelevante.
Estructura tu salida JSON para reflejar estos criterios como claves con sus puntuaciones correspondientes como valores."#,
    )
    .with_input_keys(["context"])
    .with_structured_output(OutputSchema::ContextScoring)
    .with_format_instruction()
    .with_example(Example::from_iter([
        (
            "context",
            json!("El teorema de Pitágoras es un principio fundamental en geometría. Afirma que en un triángulo rectángulo, el cuadrado de la longitud de la hipotenusa (el lado opuesto al ángulo recto) es igual a la suma de los cuadrados de las longitudes de los otros dos lados. Esto se puede escribir como a^2 + b^2 = c^2 donde c representa la longitud de la hipotenusa, y a y b representan las longitudes de los otros dos lados."),
        ),
        (
            "output",
            json!({"clarity": 3, "depth": 1, "structure": 3, "relevance": 3}),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("Albert Einstein (14 de marzo de 1879 - 18 de abril de 1955) fue un físico teórico nacido en Alemania que es ampliamente considerado como uno de los científicos más grandes e influyentes de todos los tiempos."),
        ),
        (
            "output",
            json!({"clarity": 3, "depth": 2, "structure": 3, "relevance": 3}),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("Me encanta el chocolate. Es realmente sabroso. Ah, y por cierto, la Tierra orbita alrededor del Sol, no al revés. Además, mi color favorito es el azul."),
        ),
        (
            "output",
            json!({"clarity": 2, "depth": 1, "structure": 1, "relevance": 1}),
        ),
    ]))
}

pub fn filter_question() -> Template {
    Template::new(
        FILTER_QUESTION,
        r#"Evalúa la pregunta dada por su claridad y capacidad de respuesta dada suficiente conocimiento del dominio, considerando los siguientes criterios:
1.Independencia: ¿Puede entenderse y responderse la pregunta sin necesidad de contexto adicional o acceso a referencias externas no proporcionadas dentro de la pregunta misma? Las preguntas deben ser autónomas, lo que significa que no dependen de documentos específicos, tablas o conocimientos previos no compartidos dentro de la pregunta.
2.Intención clara: ¿Es claro qué tipo de respuesta o información busca la pregunta? La pregunta debe transmitir su propósito sin ambigüedad, permitiendo una respuesta directa y relevante.
Basado en estos criterios, asigna un veredicto de "1" si una pregunta es específica, independiente y tiene una intención clara, lo que la hace comprensible y respondible basada en los detalles proporcionados. Asigna "0" si no cumple uno o más de estos criterios debido a vaguedad, dependencia de referencias externas o ambigüedad en la intención.
Proporciona comentarios y un veredicto en formato JSON, incluyendo sugerencias de mejora si la pregunta se considera poco clara. Destaca los aspectos de la pregunta que contribuyen a su claridad o falta de la misma, y ofrece consejos sobre cómo podría reformularse o detallarse para mejorar la comprensión y la capacidad de respuesta."#,
    )
    .with_input_keys(["question"])
    .with_structured_output(OutputSchema::QuestionFilter)
    .with_format_instruction()
    .with_example(Example::from_iter([
        ("question", json!("¿Cuál es el descubrimiento sobre el espacio?")),
        (
            "output",
            json!({
                "feedback": "La pregunta es demasiado vaga y amplia, pidiendo un 'descubrimiento sobre el espacio' sin especificar ningún aspecto particular, marco temporal o contexto de interés. Esto podría referirse a una amplia gama de temas, desde el descubrimiento de nuevos cuerpos celestes hasta avances en la tecnología de viajes espaciales. Para mejorar la claridad y la capacidad de respuesta, la pregunta podría especificar el tipo de descubrimiento (por ejemplo, astronómico, tecnológico), el marco temporal (por ejemplo, reciente, histórico) o el contexto (por ejemplo, dentro de un estudio de investigación específico o una misión espacial).",
                "verdict": 0,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cómo se desempeña ALMA-13B-R en comparación con otros modelos de traducción en el estudio WMT'23, basado en los resultados en el contexto1 y contexto2?"),
        ),
        (
            "output",
            json!({
                "feedback": "Esta pregunta pide una comparación del rendimiento del modelo ALMA-13B-R frente a otros modelos de traducción dentro del estudio WMT'23, refiriéndose específicamente a los resultados en 'contexto1' y 'contexto2'. Aunque especifica claramente el modelo de interés (ALMA-13B-R) y el estudio (WMT'23), asume acceso y comprensión de 'contexto1' y 'contexto2' sin explicar qué implican estos contextos. Esto hace que la pregunta sea poco clara para aquellos que no están familiarizados con el estudio WMT'23 o estos contextos específicos. Para mejorar la claridad y la capacidad de respuesta para un público más amplio, la pregunta podría beneficiarse de definir o describir 'contexto1' y 'contexto2' o explicar los criterios utilizados para la comparación en estos contextos.",
                "verdict": 0,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cómo se comparan KIWI-XXL y XCOMET con las referencias estándar de oro en la Tabla 1 en términos de puntuaciones de evaluación, rendimiento del modelo de traducción y tasa de éxito en superar las referencias?"),
        ),
        (
            "output",
            json!({
                "feedback": "La pregunta solicita una comparación entre los modelos KIWI-XXL y XCOMET y las referencias estándar de oro en 'Tabla 1', centrándose en las puntuaciones de evaluación, el rendimiento del modelo de traducción y las tasas de éxito en superar las referencias. Especifica los modelos y los criterios para la comparación, haciendo clara la intención. Sin embargo, la pregunta asume acceso a 'Tabla 1' sin proporcionar su contenido o contexto, lo que la hace poco clara para aquellos sin acceso directo al material fuente. Para ser más clara y responderse para un público general, la pregunta podría incluir una breve descripción del contenido o hallazgos clave de 'Tabla 1', o alternativamente, enmarcar la pregunta de manera que no dependa de documentos específicos no publicados.",
                "verdict": 0,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cuál es la configuración del objetivo de entrenamiento UL2 en OpenMoE y por qué es una mejor opción para el pre-entrenamiento?"),
        ),
        (
            "output",
            json!({
                "feedback": "La pregunta pide información detallada sobre la configuración del objetivo de entrenamiento UL2 dentro del marco OpenMoE y la razón detrás de su idoneidad para el pre-entrenamiento. Es clara al especificar el tema de interés (objetivo de entrenamiento UL2, OpenMoE) y busca información detallada tanto sobre la configuración como sobre las razones de su eficacia en el preentrenamiento. Sin embargo, la pregunta podría ser un desafío para aquellos que no están familiarizados con la terminología específica o el contexto de OpenMoE y UL2. Para una mayor claridad y capacidad de respuesta, sería útil si la pregunta incluyera una breve explicación o contexto sobre OpenMoE y el objetivo de entrenamiento UL2, o aclarara los aspectos de la eficacia del pre-entrenamiento a los que se refiere (por ejemplo, eficiencia, precisión, generalización).",
                "verdict": 1,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cuál es la configuración detallada del objetivo de entrenamiento UL2 en OpenMoE, basado en el contexto proporcionado?"),
        ),
        (
            "output",
            json!({
                "feedback": "La pregunta busca información detallada sobre la configuración del objetivo de entrenamiento UL2 dentro del marco OpenMoE, mencionando 'el contexto proporcionado' sin incluir o describir realmente este contexto dentro de la consulta. Esto hace que la pregunta sea poco clara para aquellos que no tienen acceso al contexto no especificado. Para que la pregunta sea clara y respondible, necesita incluir el contexto relevante directamente dentro de la pregunta o enmarcarse de una manera que no requiera información externa. Detallar los aspectos específicos de la configuración de interés (por ejemplo, funciones de pérdida, técnicas de aumento de datos) también podría ayudar a aclarar la consulta.",
                "verdict": 0,
            }),
        ),
    ]))
}

pub fn evolution_elimination() -> Template {
    Template::new(
        EVOLUTION_ELIMINATION,
        r#"Verifica si las dos preguntas dadas son iguales basándote en los siguientes requisitos:
1. Tienen las mismas restricciones y requisitos.
2. Tienen la misma profundidad y amplitud de la consulta.
Da un veredicto de 1 si son iguales y 0 si no lo son."#,
    )
    .with_input_keys(["question1", "question2"])
    .with_structured_output(OutputSchema::EvolutionElimination)
    .with_format_instruction()
    .with_example(Example::from_iter([
        (
            "question1",
            json!("¿Cuáles son las principales causas del cambio climático?"),
        ),
        (
            "question2",
            json!("¿Qué factores contribuyen al calentamiento global?"),
        ),
        (
            "output",
            json!({
                "reason": "Aunque ambas preguntas tratan sobre problemas ambientales, el 'cambio climático' abarca cambios más amplios que el 'calentamiento global', lo que lleva a diferentes profundidades de indagación.",
                "verdict": 0,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question1",
            json!("¿Cómo funciona la fotosíntesis en las plantas?"),
        ),
        (
            "question2",
            json!("¿Puedes explicar el proceso de fotosíntesis en las plantas?"),
        ),
        (
            "output",
            json!({
                "reason": "Ambas preguntas solicitan una explicación del proceso de fotosíntesis en las plantas, compartiendo la misma profundidad, amplitud y requisitos para la respuesta",
                "verdict": 1,
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "question1",
            json!("¿Cuáles son los beneficios para la salud del ejercicio regular?"),
        ),
        (
            "question2",
            json!("¿Puedes enumerar las ventajas de hacer ejercicio regularmente para la salud?"),
        ),
        (
            "output",
            json!({
                "reason": "Ambas preguntas buscan información sobre los efectos positivos del ejercicio regular en la salud. Requieren un nivel similar de detalle al enumerar los beneficios para la salud.",
                "verdict": 1,
            }),
        ),
    ]))
}

/// All quality filter templates.
pub fn templates() -> Vec<Template> {
    vec![score_context(), filter_question(), evolution_elimination()]
}

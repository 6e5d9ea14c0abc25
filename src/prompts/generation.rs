//! Extraction and generation prompts.
//!
//! Templates that read source documents (keyphrases, main topics), seed and
//! answer questions from a context, pick relevant contexts for a question and
//! rewrite a question from critic feedback.

use serde_json::json;

use super::template::{Example, Template};
use crate::schema::OutputSchema;

pub const ANSWER_FORMULATE: &str = "answer_formulate";
pub const KEYPHRASE_EXTRACTION: &str = "keyphrase_extraction";
pub const SEED_QUESTION: &str = "seed_question";
pub const MAIN_TOPIC_EXTRACTION: &str = "main_topic_extraction";
pub const FIND_RELEVANT_CONTEXT: &str = "find_relevant_context";
pub const REWRITE_QUESTION: &str = "rewrite_question";

pub fn answer_formulate() -> Template {
    Template::new(
        ANSWER_FORMULATE,
        "Responde la pregunta utilizando la información del contexto dado. Da un veredicto como '1' si la respuesta está presente, '-1' si la respuesta no está presente en el contexto.",
    )
    .with_input_keys(["context", "question"])
    .with_output_key("answer")
    .with_structured_output(OutputSchema::AnswerFormulation)
    .with_example(Example::from_iter([
        (
            "context",
            json!("El cambio climático está significativamente influenciado por actividades humanas, notablemente la emisión de gases de efecto invernadero por la quema de combustibles fósiles. El aumento de la concentración de gases de efecto invernadero en la atmósfera atrapa más calor, lo que lleva al calentamiento global y a cambios en los patrones climáticos."),
        ),
        (
            "question",
            json!("¿Cómo contribuyen las actividades humanas al cambio climático?"),
        ),
        (
            "answer",
            json!({
                "answer": "Las actividades humanas contribuyen al cambio climático principalmente a través de la emisión de gases de efecto invernadero provenientes de la quema de combustibles fósiles. Estas emisiones aumentan la concentración de gases de efecto invernadero en la atmósfera, lo que atrapa más calor y conduce al calentamiento global y a cambios en los patrones climáticos.",
                "verdict": "1",
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("El concepto de inteligencia artificial (IA) ha evolucionado con el tiempo, pero fundamentalmente se refiere a máquinas diseñadas para imitar funciones cognitivas humanas. La IA puede aprender, razonar, percibir y, en algunas instancias, reaccionar como los humanos, lo que la hace fundamental en campos que van desde la salud hasta los vehículos autónomos."),
        ),
        (
            "question",
            json!("¿Cuáles son las capacidades clave de la inteligencia artificial?"),
        ),
        (
            "answer",
            json!({
                "answer": "La inteligencia artificial está diseñada para imitar las funciones cognitivas humanas, con capacidades clave que incluyen el aprendizaje, el razonamiento, la percepción y la reacción al entorno de manera similar a los humanos. Estas capacidades hacen que la IA sea fundamental en varios campos, incluyendo la atención médica y la conducción autónoma.",
                "verdict": "1",
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("La novela \"Orgullo y Prejuicio\" de Jane Austen gira en torno a la personaje Elizabeth Bennet y su familia. La historia se desarrolla en el siglo 19 en la Inglaterra rural y trata temas de matrimonio, moralidad y malentendidos."),
        ),
        (
            "question",
            json!("¿En qué año se publicó 'Orgullo y prejuicio'?"),
        ),
        (
            "answer",
            json!({
                "answer": "La respuesta a la pregunta dada no está presente en el contexto.",
                "verdict": "-1",
            }),
        ),
    ]))
}

pub fn keyphrase_extraction() -> Template {
    Template::new(
        KEYPHRASE_EXTRACTION,
        "Extrae de 3 a 5 frases clave del texto proporcionado, enfocándote en los aspectos más significativos y distintivos.",
    )
    .with_input_keys(["text"])
    .with_structured_output(OutputSchema::Keyphrases)
    .with_example(Example::from_iter([
        (
            "text",
            json!("Un agujero negro es una región del espacio-tiempo donde la gravedad es tan fuerte que nada, incluida la luz y otras ondas electromagnéticas, tiene suficiente energía para escapar de él. La teoría general de la relatividad predice que una masa suficientemente compacta puede deformar el espacio-tiempo para formar un agujero negro."),
        ),
        (
            "output",
            json!({
                "keyphrases": [
                    "Agujero negro",
                    "Región of espacio-tiempo",
                    "Gravedad fuerte",
                    "Luz y ondas electromagnéticas",
                    "Teoría general de la relatividad",
                ]
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "text",
            json!("La Gran Muralla China es una serie antigua de murallas y fortificaciones ubicadas en el norte de China, construidas hace unos 500 años. Esta inmensa muralla se extiende por más de 13,000 millas y es un testimonio de la habilidad y persistencia de los ingenieros chinos antiguos."),
        ),
        (
            "output",
            json!({
                "keyphrases": [
                    "Gran Muralla China",
                    "Fortificaciones antiguas",
                    "Norte de China",
                ]
            }),
        ),
    ]))
}

pub fn seed_question() -> Template {
    Template::new(
        SEED_QUESTION,
        "Genera una pregunta que pueda ser completamente respondida desde el contexto dado. La pregunta debe ser formulada usando el tema.",
    )
    .with_input_keys(["context", "keyphrase"])
    .with_output_key("question")
    .with_example(Example::from_iter([
        (
            "context",
            json!("La fotosíntesis en las plantas implica convertir la energía lumínica en energía química, utilizando clorofila y otros pigmentos para absorber la luz. Este proceso es crucial para el crecimiento de las plantas y la producción de oxígeno."),
        ),
        ("keyphrase", json!("Fotosíntesis")),
        (
            "question",
            json!("¿Cuál es el papel de la fotosíntesis en el crecimiento de las plantas?"),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("La Revolución Industrial, que comenzó en el siglo 18, marcó un punto de inflexión importante en la historia ya que condujo al desarrollo de fábricas y la urbanización."),
        ),
        ("keyphrase", json!("Revolución Industrial")),
        (
            "question",
            json!("¿Cómo marcó la Revolución Industrial un punto de inflexión importante en la historia?"),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("El proceso de evaporación juega un papel crucial en el ciclo del agua, convirtiendo el agua de líquido a vapor y permitiéndole ascender a la atmósfera."),
        ),
        ("keyphrase", json!("Evaporación")),
        (
            "question",
            json!("¿Por qué es importante la evaporación en el ciclo del agua?"),
        ),
    ]))
}

pub fn main_topic_extraction() -> Template {
    Template::new(
        MAIN_TOPIC_EXTRACTION,
        "Identifica y extrae los dos principales temas discutidos en profundidad en el texto dado.",
    )
    .with_input_keys(["text"])
    .with_structured_output(OutputSchema::MainTopics)
    .with_example(Example::from_iter([
        (
            "text",
            json!("La tecnología blockchain presenta un libro mayor descentralizado que garantiza la integridad y transparencia de las transacciones de datos. Sustenta criptomonedas como Bitcoin, proporcionando un registro seguro e inmutable de todas las transacciones. Más allá de las finanzas, la blockchain tiene aplicaciones potenciales en la gestión de la cadena de suministro, donde puede agilizar las operaciones, mejorar la trazabilidad y mejorar la prevención del fraude. Permite el seguimiento en tiempo real de los bienes y el intercambio transparente de datos entre los participantes."),
        ),
        (
            "output",
            json!({
                "topics": [
                    "Tecnología blockchain y su rol fundacional en las criptomonedas",
                    "Aplicaciones de blockchain en la gestión de la cadena de suministro",
                ]
            }),
        ),
    ]))
    .with_example(Example::from_iter([
        (
            "text",
            json!("La telemedicina ha revolucionado la forma en que se entrega la atención médica, particularmente en áreas rurales y desatendidas. Permite a los pacientes consultar con médicos mediante videoconferencia, mejorando el acceso a la atención y reduciendo la necesidad de viajar. Otro avance significativo en la atención médica es la medicina de precisión, que adapta los tratamientos a los perfiles genéticos individuales. Este enfoque ha llevado a terapias más efectivas para una variedad de condiciones, incluyendo ciertos cánceres y enfermedades crónicas."),
        ),
        (
            "output",
            json!({
                "topics": [
                    "La telemedicina y su impacto en la accesibilidad a la atención médica",
                    "Medicina de precisión y su papel en la personalización de tratamientos según perfiles genéticos",
                ]
            }),
        ),
    ]))
}

pub fn find_relevant_context() -> Template {
    Template::new(
        FIND_RELEVANT_CONTEXT,
        "Dada una pregunta y un conjunto de contextos, encuentra los contextos más relevantes para responder la pregunta.",
    )
    .with_input_keys(["question", "contexts"])
    .with_structured_output(OutputSchema::RelevantContexts)
    .with_example(Example::from_iter([
        ("question", json!("¿Cuál es la capital de Francia?")),
        (
            "contexts",
            json!([
                "1. Francia es un país en Europa Occidental. Tiene varias ciudades, incluyendo París, Lyon y Marsella. París no solo es conocido por sus puntos de referencia culturales como la Torre Eiffel y el Museo del Louvre, sino también como el centro administrativo.",
                "2. La capital de Francia es París. También es la ciudad más poblada de Francia, con una población de más de 2 millones de personas. París es conocido por sus puntos de referencia culturales como la Torre Eiffel y el Museo del Louvre.",
                "3. París es la capital de Francia. También es la ciudad más poblada de Francia, con una población de más de 2 millones de personas. París es conocido por sus puntos de referencia culturales como la Torre Eiffel y el Museo del Louvre.",
            ]),
        ),
        ("output", json!({"relevant_contexts": [1, 2]})),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cómo afecta la cafeína al cuerpo y cuáles son sus fuentes comunes?"),
        ),
        (
            "contexts",
            json!([
                "1. La cafeína es un estimulante del sistema nervioso central. Puede evitar temporalmente la somnolencia y restaurar la alerta. Afecta principalmente al cerebro, donde altera la función de los neurotransmisores.",
                "2. La actividad física regular es esencial para mantener una buena salud. Puede ayudar a controlar el peso, combatir condiciones de salud, aumentar la energía y promover un mejor sueño.",
                "3. Las fuentes comunes de cafeína incluyen café, té, cola y bebidas energéticas. Estas bebidas se consumen en todo el mundo y son conocidas por proporcionar un rápido impulso de energía.",
            ]),
        ),
        ("output", json!({"relevant_contexts": [1, 3]})),
    ]))
}

pub fn rewrite_question() -> Template {
    Template::new(
        REWRITE_QUESTION,
        "Dado un contexto, una pregunta y una retroalimentación, reescribe la pregunta para mejorar su claridad y capacidad de respuesta basándote en la retroalimentación proporcionada.",
    )
    .with_input_keys(["context", "question", "feedback"])
    .with_example(Example::from_iter([
        (
            "context",
            json!("La Torre Eiffel fue construida usando hierro y originalmente fue destinada como una exhibición temporal para la Exposición Universal de 1889 celebrada en París. A pesar de su propósito temporal inicial, la Torre Eiffel rápidamente se convirtió en un símbolo de la ingeniosidad parisina y un icónico punto de referencia de la ciudad, atrayendo millones de visitantes cada año. El diseño de la torre, creado por Gustave Eiffel, inicialmente recibió críticas de algunos artistas e intelectuales franceses, pero desde entonces ha sido celebrada como una obra maestra de la ingeniería estructural y el diseño arquitectónico."),
        ),
        ("question", json!("¿Quién creó el diseño para la Torre?")),
        (
            "feedback",
            json!("La pregunta es sobre el creador del diseño de 'la Torre', pero no especifica a cuál torre se refiere. Hay muchas torres en todo el mundo y, sin especificar la torre exacta, la pregunta es poco clara e irresoluble. Para mejorar la pregunta, debería incluir el nombre o una descripción clara de la torre específica en cuestión."),
        ),
        ("output", json!("¿Quién creó el diseño para la Torre Eiffel?")),
    ]))
    .with_example(Example::from_iter([
        (
            "context",
            json!("'Explorando el Aprendizaje Cero-Shot en Redes Neuronales' fue publicado por Smith y Lee en 2021, enfocándose en la aplicación de técnicas de aprendizaje cero-shot en inteligencia artificial."),
        ),
        (
            "question",
            json!("Qué conjuntos de datos se utilizaron para las evaluaciones de cero-disparos en este estudio?"),
        ),
        (
            "feedback",
            json!("La pregunta es sobre los conjuntos de datos utilizados para evaluaciones de cero disparos en 'este estudio', sin especificar ni proporcionar detalles sobre el estudio en cuestión. Esto hace que la pregunta sea poco clara para aquellos que no tienen acceso o conocimiento del estudio específico. Para mejorar la claridad y la capacidad de respuesta, la pregunta debería especificar el estudio al que se refiere, o proporcionar suficiente contexto sobre el estudio para que la pregunta sea entendida y respondida de manera independiente."),
        ),
        (
            "output",
            json!("¿Qué conjuntos de datos se utilizaron para las evaluaciones de cero disparos en el artículo Explorando el Aprendizaje de Cero Disparos en Redes Neuronales?"),
        ),
    ]))
}

/// All extraction and generation templates.
pub fn templates() -> Vec<Template> {
    vec![
        answer_formulate(),
        keyphrase_extraction(),
        seed_question(),
        main_topic_extraction(),
        find_relevant_context(),
        rewrite_question(),
    ]
}

//! Question evolution prompts.
//!
//! Each template rewrites a seed question into a harder variant: one needing
//! multi-step reasoning, one drawing on two contexts, one with a condition,
//! a compressed indirect one, and one split into a two-turn conversation.

use serde_json::json;

use super::template::{Example, Template};
use crate::schema::OutputSchema;

pub const REASONING_QUESTION: &str = "reasoning_question";
pub const MULTI_CONTEXT_QUESTION: &str = "multi_context_question";
pub const CONDITIONAL_QUESTION: &str = "conditional_question";
pub const COMPRESS_QUESTION: &str = "compress_question";
pub const CONVERSATION_QUESTION: &str = "conversation_question";

pub fn reasoning_question() -> Template {
    Template::new(
        REASONING_QUESTION,
        r#"Complica la pregunta dada reescribiéndola como una pregunta de razonamiento múltiple basada en el contexto proporcionado.
Responder la pregunta debe requerir que el lector haga múltiples conexiones lógicas o inferencias usando la información disponible en el contexto dado.
Reglas a seguir al reescribir la pregunta:
1. Asegúrate de que la pregunta reescrita pueda ser respondida completamente desde la información presente en los contextos.
2. No formules preguntas que contengan más de 15 palabras. Usa abreviaturas siempre que sea posible.
3. Asegúrate de que la pregunta sea clara y unívoca.
4. No se permiten frases como 'basado en el contexto proporcionado', 'de acuerdo con el contexto', etc. en la pregunta."#,
    )
    .with_input_keys(["question", "context"])
    .with_example(Example::from_iter([
        ("question", json!("¿Cuál es la capital de Francia?")),
        (
            "context",
            json!("Francia es un país en Europa Occidental. Cuenta con varias ciudades, incluyendo París, Lyon y Marsella. París no solo es conocido por sus puntos de referencia culturales como la Torre Eiffel y el Museo del Louvre, sino también como el centro administrativo."),
        ),
        (
            "output",
            json!("Conectando la Torre Eiffel y el centro administrativo, ¿qué ciudad se destaca por ambos?"),
        ),
    ]))
    .with_example(Example::from_iter([
        ("question", json!("¿Qué hace el método append() en Python?")),
        (
            "context",
            json!("En Python, las listas se utilizan para almacenar múltiples elementos en una sola variable. Las listas son uno de los 4 tipos de datos integrados utilizados para almacenar colecciones de datos. El método append() añade un solo elemento al final de la lista."),
        ),
        (
            "output",
            json!("Si una lista representa una colección de variables, ¿qué método la extiende añadiendo un elemento?"),
        ),
    ]))
}

pub fn multi_context_question() -> Template {
    Template::new(
        MULTI_CONTEXT_QUESTION,
        r#"La tarea es reescribir y complicar la pregunta dada de tal manera que responderla requiera información derivada tanto del contexto1 como del contexto2.
Sigue las reglas dadas a continuación mientras reescribes la pregunta.
    1. La pregunta reescrita no debe ser muy larga. Usa abreviaturas siempre que sea posible.
    2. La pregunta reescrita debe ser razonable y debe ser comprendida y respondida por los humanos.
    3. La pregunta reescrita debe ser completamente respondible desde la información presente en el contexto1 y contexto2.
    4. Lee y comprende ambos contextos y reescribe la pregunta para que responderla requiera comprensión de ambos contextos.
    5. No se permiten frases como 'basado en el contexto proporcionado', 'de acuerdo con el contexto', etc. en la pregunta."#,
    )
    .with_input_keys(["question", "context1", "context2"])
    .with_example(Example::from_iter([
        ("question", json!("¿Qué proceso vuelve verdes a las plantas?")),
        (
            "context1",
            json!("La clorofila es el pigmento que da a las plantas su color verde y les ayuda a fotosintetizar."),
        ),
        (
            "context2",
            json!("La fotosíntesis en las plantas ocurre típicamente en las hojas donde los cloroplastos están concentrados."),
        ),
        (
            "output",
            json!("¿En qué estructuras de las plantas el pigmento responsable de su verdor facilita la producción de energía?"),
        ),
    ]))
    .with_example(Example::from_iter([
        ("question", json!("¿Cómo se calcula el área de un rectángulo?")),
        (
            "context1",
            json!("El área de una figura se calcula en base a las dimensiones de la figura. Para los rectángulos, esto implica multiplicar el largo y el ancho."),
        ),
        (
            "context2",
            json!("Los rectángulos tienen cuatro lados, siendo los lados opuestos iguales en longitud. Son un tipo de cuadrilátero."),
        ),
        (
            "output",
            json!("¿Qué multiplicación que involucra opuestos iguales produce el área de un cuadrilátero?"),
        ),
    ]))
}

pub fn conditional_question() -> Template {
    Template::new(
        CONDITIONAL_QUESTION,
        r#"Reescribe la pregunta proporcionada para aumentar su complejidad introduciendo un elemento condicional.
El objetivo es hacer la pregunta más compleja incorporando un escenario o condición que afecte el contexto de la pregunta.
Sigue las reglas dadas a continuación al reescribir la pregunta.
    1. La pregunta reescrita no debe ser más larga de 25 palabras. Usa abreviaturas siempre que sea posible.
    2. La pregunta reescrita debe ser razonable y debe ser comprendida y respondida por los humanos.
    3. La pregunta reescrita debe ser completamente respondible desde el contexto presente.
    4. No se permiten frases como 'contexto proporcionado', 'de acuerdo con el contexto', etc. en la pregunta."#,
    )
    .with_input_keys(["question", "context"])
    .with_example(Example::from_iter([
        ("question", json!("¿Cuál es la función de las raíces de una planta?")),
        (
            "context",
            json!("Las raíces de una planta absorben agua y nutrientes del suelo, anclan la planta en el suelo y almacenan alimentos."),
        ),
        (
            "output",
            json!("¿Qué doble propósito cumplen las raíces de las plantas con respecto a los nutrientes del suelo y la estabilidad?"),
        ),
    ]))
    .with_example(Example::from_iter([
        ("question", json!("¿Cómo protegen las vacunas contra las enfermedades?")),
        (
            "context",
            json!("Las vacunas protegen contra enfermedades estimulando la respuesta inmunitaria del cuerpo para producir anticuerpos, los cuales reconocen y combaten patógenos."),
        ),
        (
            "output",
            json!("¿Cómo utilizan las vacunas el sistema inmunitario del cuerpo para defenderse de los patógenos?"),
        ),
    ]))
}

pub fn compress_question() -> Template {
    Template::new(
        COMPRESS_QUESTION,
        r#"Reescribe la siguiente pregunta para hacerla más indirecta y más corta mientras retienes la esencia de la pregunta original.
El objetivo es crear una pregunta que transmita el mismo significado pero de una manera menos directa. La pregunta reescrita debe ser más corta, así que usa abreviaturas siempre que sea posible."#,
    )
    .with_input_keys(["question"])
    .with_example(Example::from_iter([
        ("question", json!("¿Cuál es la distancia entre la Tierra y la Luna?")),
        ("output", json!("¿Qué tan lejos está la Luna de la Tierra?")),
    ]))
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Qué ingredientes se necesitan para hornear un pastel de chocolate?"),
        ),
        ("output", json!("¿Qué se necesita para un pastel de chocolate?")),
    ]))
}

pub fn conversation_question() -> Template {
    Template::new(
        CONVERSATION_QUESTION,
        r#"Reformatea la pregunta proporcionada en dos preguntas separadas como si fuera parte de una conversación. Cada pregunta debe enfocarse en un aspecto o subtema específico relacionado con la pregunta original.
Sigue las reglas dadas a continuación al reescribir la pregunta.
    1. La pregunta reescrita no debe ser más larga de 25 palabras. Usa abreviaturas siempre que sea posible.
    2. La pregunta reescrita debe ser razonable y debe ser comprendida y respondida por los humanos.
    3. La pregunta reescrita debe ser completamente respondible desde el contexto presente.
    4. No se permiten frases como 'contexto proporcionado', 'de acuerdo con el contexto', etc. en la pregunta."#,
    )
    .with_input_keys(["question"])
    .with_structured_output(OutputSchema::ConversationQuestions)
    .with_example(Example::from_iter([
        (
            "question",
            json!("¿Cuáles son las ventajas y desventajas del trabajo remoto?"),
        ),
        (
            "output",
            json!({
                "first_question": "¿Cuáles son los beneficios del trabajo remoto?",
                "second_question": "Por otro lado, ¿qué desafíos se encuentran al trabajar de manera remota?",
            }),
        ),
    ]))
}

/// All question evolution templates.
pub fn templates() -> Vec<Template> {
    vec![
        reasoning_question(),
        multi_context_question(),
        conditional_question(),
        compress_question(),
        conversation_question(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolution_templates_validate() {
        for template in templates() {
            assert!(
                template.validate().is_ok(),
                "{} failed: {:?}",
                template.name,
                template.validate()
            );
        }
    }

    #[test]
    fn test_rewrites_keep_question_as_first_input() {
        for template in templates() {
            assert_eq!(template.input_keys[0], "question", "{}", template.name);
            assert_eq!(template.output_key, "output");
        }
    }

    #[test]
    fn test_only_conversation_is_structured() {
        for template in templates() {
            assert_eq!(
                template.is_structured(),
                template.name == CONVERSATION_QUESTION,
                "{}",
                template.name
            );
        }
    }

    #[test]
    fn test_multi_context_mentions_both_contexts() {
        let template = multi_context_question();
        assert!(template.instruction.contains("contexto1"));
        assert!(template.instruction.contains("contexto2"));
        assert_eq!(template.input_keys, vec!["question", "context1", "context2"]);
    }
}

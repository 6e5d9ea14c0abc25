//! Output repair prompt.
//!
//! Rendered after a structured answer fails validation, with the prompt that
//! produced it and the rejected completion. See
//! [`OutputError::repair_inputs`](crate::error::OutputError::repair_inputs).

use super::template::Template;

pub const FIX_OUTPUT_FORMAT: &str = "fix_output_format";

pub fn fix_output_format() -> Template {
    Template::new(
        FIX_OUTPUT_FORMAT,
        "A continuación, la respuesta (completion) no cumplió las restricciones indicadas en el prompt. Corrige la respuesta para que las cumpla y devuelve únicamente la respuesta corregida, sin explicaciones.",
    )
    .with_input_keys(["prompt", "completion"])
    .with_output_key("fixed_completion")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PromptInputs;

    #[test]
    fn test_fix_output_format_renders_without_examples() {
        let template = fix_output_format();
        assert!(template.validate().is_ok());
        assert!(template.examples.is_empty());

        let inputs = PromptInputs::new()
            .with("prompt", "Devuelve JSON.")
            .with("completion", "{\"verdict\": ");
        let rendered = template.render(&inputs).unwrap();
        assert!(!rendered.contains("Ejemplos:"));
        assert!(rendered.ends_with("fixed_completion: "));
    }
}

//! Template catalogue and lookup by name.
//!
//! The built-in catalogue holds every template in [`crate::prompts`]. It is
//! built once on first use, never mutated, and shared across threads.
//! Localized catalogues are copies of it with stored variants swapped in.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use tracing::{debug, info};

use crate::config::CatalogueConfig;
use crate::error::TemplateError;
use crate::prompts::{builtin_templates, Template};

static BUILTIN: LazyLock<Catalogue> = LazyLock::new(|| {
    let catalogue = Catalogue::from_trusted(builtin_templates());
    debug!("Initialized built-in catalogue with {} templates", catalogue.len());
    catalogue
});

/// A set of templates keyed by unique name, iterated in registration order.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    templates: HashMap<String, Template>,
    order: Vec<String>,
}

impl Catalogue {
    /// The process-wide catalogue of built-in templates.
    pub fn builtin() -> &'static Catalogue {
        &BUILTIN
    }

    /// Builds a catalogue from arbitrary templates.
    ///
    /// # Errors
    ///
    /// `DuplicateName` when two templates share a name, or the first
    /// validation error of any template.
    pub fn from_templates<I>(templates: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = Template>,
    {
        let mut catalogue = Self::default();
        for template in templates {
            template.validate()?;
            if catalogue.templates.contains_key(&template.name) {
                return Err(TemplateError::DuplicateName(template.name));
            }
            catalogue.order.push(template.name.clone());
            catalogue.templates.insert(template.name.clone(), template);
        }
        Ok(catalogue)
    }

    /// Built-in definitions are checked by the test suite, not at startup.
    fn from_trusted(templates: Vec<Template>) -> Self {
        let mut catalogue = Self::default();
        for template in templates {
            catalogue.order.push(template.name.clone());
            catalogue.templates.insert(template.name.clone(), template);
        }
        catalogue
    }

    /// Returns the built-in catalogue, overlaid with the configured
    /// language's stored variants when a cache directory is set.
    ///
    /// # Errors
    ///
    /// `Config` when the configuration does not validate, otherwise the
    /// errors of [`Catalogue::localized`].
    pub fn from_config(config: &CatalogueConfig) -> Result<Self, TemplateError> {
        config.validate()?;
        match &config.cache_dir {
            Some(dir) => Self::builtin().localized(dir, &config.language),
            None => Ok(Self::builtin().clone()),
        }
    }

    /// Looks up a template by name.
    ///
    /// # Errors
    ///
    /// `NotFound` when no template is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Templates in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.order.iter().filter_map(|name| self.templates.get(name))
    }

    /// Copy of this catalogue with every template that has a stored variant
    /// for `language` under `cache_dir` replaced by that variant.
    ///
    /// # Errors
    ///
    /// `InvalidLanguage` when `language` is not a plain language tag, any
    /// error loading a variant file that exists, and
    /// `IncompatibleVariant` when a variant changes the template's input
    /// keys, output key or output type.
    pub fn localized(
        &self,
        cache_dir: impl AsRef<Path>,
        language: &str,
    ) -> Result<Self, TemplateError> {
        let cache_dir = cache_dir.as_ref();
        let mut localized = self.clone();
        let mut replaced = 0;

        for name in &self.order {
            if !Template::variant_path(cache_dir, language, name)?.is_file() {
                continue;
            }
            let base = self.get(name)?;
            let variant = Template::load(cache_dir, language, name)?;
            check_compatible(base, &variant)?;
            localized.templates.insert(name.clone(), variant);
            replaced += 1;
        }

        info!(
            "Localized catalogue to '{}': {} of {} templates replaced from {}",
            language,
            replaced,
            self.len(),
            cache_dir.display()
        );
        Ok(localized)
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a Template;
    type IntoIter = Box<dyn Iterator<Item = &'a Template> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn check_compatible(base: &Template, variant: &Template) -> Result<(), TemplateError> {
    let reason = if variant.input_keys != base.input_keys {
        Some(format!(
            "input keys {:?} differ from {:?}",
            variant.input_keys, base.input_keys
        ))
    } else if variant.output_key != base.output_key {
        Some(format!(
            "output key '{}' differs from '{}'",
            variant.output_key, base.output_key
        ))
    } else if variant.output_type != base.output_type {
        Some(format!(
            "output type {:?} differs from {:?}",
            variant.output_type, base.output_type
        ))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TemplateError::IncompatibleVariant {
            template: base.name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Looks up a built-in template by name.
///
/// # Examples
///
/// ```
/// use qa_forge::get_template;
///
/// let template = get_template("answer_formulate").unwrap();
/// assert_eq!(template.output_key, "answer");
/// assert!(get_template("does_not_exist").is_err());
/// ```
pub fn get_template(name: &str) -> Result<&'static Template, TemplateError> {
    Catalogue::builtin().get(name)
}

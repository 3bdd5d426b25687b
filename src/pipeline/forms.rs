use crate::config::PipelineConfig;
use crate::fetch::SpeciesPage;
use crate::pipeline::canonicalize::NameCanonicalizer;

/// One output identity produced from a scraped page: the canonical name it
/// will be emitted under, its resolved flat ability list, and the auxiliary
/// form descriptor for unregistered parenthetical variants.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub name: String,
    pub abilities: Vec<String>,
    pub form_name: Option<String>,
}

/// Expands a species into its registered cosmetic forms and reconciles
/// per-form ability data.
pub struct FormResolver<'a> {
    config: &'a PipelineConfig,
}

impl<'a> FormResolver<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Resolve the output identities for one scraped page.
    ///
    /// A registered base name yields the original identity plus one identity
    /// per listed form; everything but name and abilities is shared, so the
    /// caller clones the rest. An unregistered name with a parenthetical
    /// descriptor stays a single identity carrying `form_name`.
    pub fn resolve(
        &self,
        raw_name: &str,
        canonical_name: &str,
        page: &SpeciesPage,
    ) -> Vec<ResolvedIdentity> {
        let base_name = NameCanonicalizer::base_name(raw_name);

        if let Some(forms) = self.config.forms_for(&base_name) {
            let mut identities = vec![ResolvedIdentity {
                name: canonical_name.to_string(),
                abilities: page.abilities.clone(),
                form_name: None,
            }];
            for form in forms {
                identities.push(ResolvedIdentity {
                    name: form.name.clone(),
                    abilities: self.abilities_for_label(page, &form.label),
                    form_name: None,
                });
            }
            return identities;
        }

        let form_name = NameCanonicalizer::form_descriptor(raw_name);
        let abilities = match &form_name {
            Some(label) => self.abilities_for_label(page, label),
            None => page.abilities.clone(),
        };
        vec![ResolvedIdentity {
            name: canonical_name.to_string(),
            abilities,
            form_name,
        }]
    }

    /// Ability list for an in-page section label, falling back to the base
    /// species' abilities when the page has no distinct section for it.
    fn abilities_for_label(&self, page: &SpeciesPage, label: &str) -> Vec<String> {
        page.form_abilities
            .iter()
            .find(|(section, _)| section == label)
            .map(|(_, abilities)| abilities.clone())
            .unwrap_or_else(|| page.abilities.clone())
    }
}

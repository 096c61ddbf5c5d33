//! The generation context: the one record every fragment renders against.
//!
//! Built once per run from a validated [`Definition`]. Schema artifacts,
//! composed endpoint code and the import list are filled in by the
//! orchestrator as the run progresses; after that the context is read-only.

use serde::Serialize;

use crate::domain::entities::definition::{Definition, Maintainer};
use crate::domain::naming::to_pascal_case;

/// Prefix for SonarCloud project keys.
pub const SONAR_PROJECT_PREFIX: &str = "PavedRoad_";

const ALL_WITH_FOSSA: &str = "all: mod-setup $(PREFLIGHT) $(FOSSATEST) compile check";
const ALL_WITHOUT_FOSSA: &str = "all: mod-setup $(PREFLIGHT) compile check";
const CHECK_WITH_SONAR: &str =
    "check: lint docker-build sonar-scanner $(ARTIFACTS) $(LOGS) $(ASSETS) $(DOCS)";
const CHECK_WITHOUT_SONAR: &str = "check: lint docker-build $(ARTIFACTS) $(LOGS) $(ASSETS) $(DOCS)";
const FOSSA_BUILD_SECTION: &str = "\n$(FOSSATEST):\n\tfossa init\n";
const FOSSA_LINT_SECTION: &str = "\n\t@echo \"  >  running FOSSA license scan.\"\n\t$(shell (export GOPATH=$(GOPATH); @FOSSA_API_KEY=$(FOSSA_API_KEY) fossa analyze))\n";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SonarSettings {
    pub enabled: bool,
    pub key: String,
    pub login: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MakefileSections {
    pub all_build_target: String,
    pub check_build_target: String,
    pub fossa_build_section: String,
    pub fossa_lint_section: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationContext {
    // Identity
    pub name: String,
    pub name_exported: String,
    pub blueprint: String,
    pub definition_file: String,
    pub organization: String,
    pub org_sql_safe: String,
    pub version: String,
    pub api_version: String,
    pub release_status: String,

    // Project
    pub project_info: String,
    pub license: String,
    pub maintainer: Maintainer,
    pub tld: String,
    pub scheduler_name: String,

    // Kubernetes
    pub namespace: String,
    pub liveness: String,
    pub readiness: String,
    pub metrics: String,
    pub management: String,
    pub explain: String,

    // Integrations
    pub sonar: SonarSettings,
    pub fossa_enabled: bool,
    pub badges: String,
    pub makefile: MakefileSections,

    // Schema
    pub primary_table_name: String,
    pub generated_types: String,
    pub post_json: String,
    pub put_json: String,

    // Composed code
    pub imports: String,
    pub endpoint_routes: String,
    pub endpoint_handlers: String,
    pub endpoint_hooks: String,
}

impl GenerationContext {
    /// Map a definition onto the context. Schema and composed-code fields
    /// start empty.
    pub fn from_definition(definition: &Definition) -> Self {
        let info = &definition.info;
        let project = &definition.project;
        let kube = &project.kubernetes;

        let sonar = match definition.integration("sonarcloud") {
            Some(integration) => {
                let cfg = integration.sonar_cloud_config.clone().unwrap_or_default();
                SonarSettings {
                    enabled: integration.enable,
                    key: cfg.key,
                    login: cfg.login,
                    prefix: SONAR_PROJECT_PREFIX.to_string(),
                }
            }
            None => SonarSettings::default(),
        };
        let fossa_enabled = definition.integration_enabled("fossa");

        let makefile = MakefileSections {
            all_build_target: if fossa_enabled { ALL_WITH_FOSSA } else { ALL_WITHOUT_FOSSA }.into(),
            check_build_target: if sonar.enabled {
                CHECK_WITH_SONAR
            } else {
                CHECK_WITHOUT_SONAR
            }
            .into(),
            fossa_build_section: if fossa_enabled { FOSSA_BUILD_SECTION } else { "" }.into(),
            fossa_lint_section: if fossa_enabled { FOSSA_LINT_SECTION } else { "" }.into(),
        };

        let badges = project
            .integrations
            .iter()
            .filter(|i| i.enable)
            .flat_map(|i| i.shields.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            name: info.name.to_lowercase(),
            name_exported: to_pascal_case(&info.name),
            blueprint: info.id.clone(),
            definition_file: definition.definition_file.clone().unwrap_or_default(),
            organization: info.organization.clone(),
            org_sql_safe: to_pascal_case(&info.organization),
            version: info.version.clone(),
            api_version: info.api_version.clone(),
            release_status: info.release_status.clone(),
            project_info: project.description.clone(),
            license: project.license.clone(),
            maintainer: project.maintainer.clone(),
            tld: project.top_level_domain.clone(),
            scheduler_name: project.scheduler_name.clone(),
            namespace: kube.namespace.clone(),
            liveness: kube.liveness.clone(),
            readiness: kube.readiness.clone(),
            metrics: kube.metrics.clone(),
            management: kube.management.clone(),
            explain: kube.explain.clone(),
            sonar,
            fossa_enabled,
            badges,
            makefile,
            primary_table_name: definition
                .tables
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Render a deduplicated import list as a module-header block. Imports
    /// that already carry quotes (aliased or blank imports) are kept verbatim.
    pub fn set_imports(&mut self, imports: &[String]) {
        let unique = flatten_unique(imports);
        self.imports = unique
            .iter()
            .map(|i| {
                if i.contains('"') {
                    format!("\t{i}\n")
                } else {
                    format!("\t\"{i}\"\n")
                }
            })
            .collect::<String>();
    }
}

/// Deduplicate, keeping first-seen order.
pub fn flatten_unique(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|o| o == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::definition::{Integration, SonarCloudConfig, Table};

    fn definition() -> Definition {
        let mut def = Definition::default();
        def.info.name = "Billing".into();
        def.info.organization = "acme-corp".into();
        def.info.id = "datamgr".into();
        def.project.kubernetes.namespace = "payments".into();
        def.tables.push(Table::new("invoice", "JSONB"));
        def
    }

    #[test]
    fn maps_identity_fields() {
        let ctx = GenerationContext::from_definition(&definition());
        assert_eq!(ctx.name, "billing");
        assert_eq!(ctx.name_exported, "Billing");
        assert_eq!(ctx.org_sql_safe, "AcmeCorp");
        assert_eq!(ctx.blueprint, "datamgr");
        assert_eq!(ctx.namespace, "payments");
        assert_eq!(ctx.primary_table_name, "invoice");
    }

    #[test]
    fn makefile_sections_follow_integrations() {
        let plain = GenerationContext::from_definition(&definition());
        assert_eq!(plain.makefile.all_build_target, ALL_WITHOUT_FOSSA);
        assert_eq!(plain.makefile.check_build_target, CHECK_WITHOUT_SONAR);
        assert!(plain.makefile.fossa_build_section.is_empty());

        let mut def = definition();
        def.project.integrations = vec![
            Integration {
                name: "fossa".into(),
                enable: true,
                shields: vec!["[fossa]".into()],
                ..Integration::default()
            },
            Integration {
                name: "sonarcloud".into(),
                enable: true,
                sonar_cloud_config: Some(SonarCloudConfig {
                    key: "billing".into(),
                    login: "token".into(),
                    ..SonarCloudConfig::default()
                }),
                ..Integration::default()
            },
        ];
        let ctx = GenerationContext::from_definition(&def);
        assert!(ctx.fossa_enabled);
        assert!(ctx.sonar.enabled);
        assert_eq!(ctx.sonar.key, "billing");
        assert_eq!(ctx.sonar.prefix, SONAR_PROJECT_PREFIX);
        assert_eq!(ctx.makefile.all_build_target, ALL_WITH_FOSSA);
        assert_eq!(ctx.makefile.check_build_target, CHECK_WITH_SONAR);
        assert!(ctx.makefile.fossa_lint_section.contains("fossa analyze"));
        assert_eq!(ctx.badges, "[fossa]");
    }

    #[test]
    fn imports_are_deduplicated_in_order() {
        let mut ctx = GenerationContext::default();
        ctx.set_imports(&[
            "net/http".into(),
            "time".into(),
            "net/http".into(),
            " ".into(),
        ]);
        assert_eq!(ctx.imports, "\t\"net/http\"\n\t\"time\"\n");
    }

    #[test]
    fn quoted_imports_are_kept_verbatim() {
        let mut ctx = GenerationContext::default();
        ctx.set_imports(&["_ \"github.com/lib/pq\"".into(), "log".into()]);
        assert_eq!(ctx.imports, "\t_ \"github.com/lib/pq\"\n\t\"log\"\n");
    }

    #[test]
    fn same_definition_gives_equal_contexts() {
        let mut def = definition();
        def.project.maintainer.name = "Ops".into();
        def.project.maintainer.email = "ops@acme.io".into();

        let a = GenerationContext::from_definition(&def);
        let b = GenerationContext::from_definition(&def);
        assert_eq!(a, b);
        assert_eq!(a.maintainer.email, "ops@acme.io");
    }
}

//! Reads service definitions from YAML.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use paver_core::{application::ApplicationError, domain::Definition, error::PaverResult};

/// Load and parse a definition file. The file name is recorded on the
/// definition for templates that mention it.
#[instrument(fields(path = %path.display()))]
pub fn load_definition(path: &Path) -> PaverResult<Definition> {
    let raw = fs::read_to_string(path).map_err(|e| ApplicationError::DefinitionLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut definition = parse_definition(&raw).map_err(|reason| ApplicationError::DefinitionLoad {
        path: path.to_path_buf(),
        reason,
    })?;
    definition.definition_file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    debug!(
        service = %definition.info.name,
        tables = definition.tables.len(),
        endpoints = definition.project.endpoints.len(),
        "Definition loaded"
    );
    Ok(definition)
}

/// Parse definition YAML. Errors carry the parser's location text.
pub fn parse_definition(yaml: &str) -> Result<Definition, String> {
    serde_yaml::from_str(yaml).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paver_core::domain::{LogicalType, Trigger};
    use tempfile::TempDir;

    const BILLING: &str = r#"
tables:
  - table-name: invoice
    table-type: jsonb
    parent-tables: ""
    columns:
      - name: id
        type: string
        mapped-name: id
        modifiers: omitempty
      - name: issued
        type: time
        mapped-name: issued
  - table-name: lines
    table-type: list
    parent-tables: invoice
    columns:
      - name: qty
        type: int
        mapped-name: quantity
info:
  api-version: v1
  id: datamgr
  name: billing
  organization: acme
  release-status: alpha
  version: 1.0.0
project:
  top_level_domain: acme.io
  description: Invoice storage
  license: Apache2
  maintainer:
    name: Jo Doe
    email: jo@acme.io
  integrations:
    - name: sonarcloud
      enable: true
      shields: ["[![quality](x)](y)"]
      sonar-cloud-config:
        login: token
        key: acme_billing
        options:
          coverage: { enable: true, report: cover.out }
  kubernetes:
    namespace: payments
    liveness: healthz
    readiness: ready
  endpoints:
    - name: invoices
      methods:
        - method: get
          qp:
            - name: limit
              datatype: int
        - method: post
  loggers:
    - id: io.pavedroad.core.loggers.application
      labels: [logging]
"#;

    #[test]
    fn parses_a_full_definition() {
        let def = parse_definition(BILLING).unwrap();
        assert_eq!(def.tables.len(), 2);
        assert_eq!(def.tables[1].parent, "invoice");
        assert_eq!(def.tables[0].columns[0].modifiers, "omitempty");
        assert_eq!(def.tables[0].columns[1].logical_type(), Some(LogicalType::Time));
        assert_eq!(def.tables[1].columns[0].external_name(), "quantity");

        assert_eq!(def.info.release_status, "alpha");
        assert_eq!(def.project.kubernetes.namespace, "payments");
        assert_eq!(def.project.maintainer.email, "jo@acme.io");

        let sonar = def.integration("SonarCloud").unwrap();
        assert_eq!(sonar.sonar_cloud_config.as_ref().unwrap().key, "acme_billing");

        let endpoint = &def.project.endpoints[0];
        assert_eq!(endpoint.triggers(), vec![Trigger::new("GET"), Trigger::new("POST")]);
        assert_eq!(endpoint.methods[0].query_parameters[0].name, "limit");
        assert_eq!(def.project.loggers[0].labels, vec!["logging"]);
    }

    #[test]
    fn records_the_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("billing.yaml");
        fs::write(&path, BILLING).unwrap();
        let def = load_definition(&path).unwrap();
        assert_eq!(def.definition_file.as_deref(), Some("billing.yaml"));
    }

    #[test]
    fn malformed_yaml_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "tables: [\n  - table-name").unwrap();
        let err = load_definition(&path).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_definition(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("here.yaml"));
    }
}

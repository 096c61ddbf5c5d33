//! Blocks compiled into the binary.
//!
//! These are the Gorilla HTTP endpoint blocks (routes, handlers, hooks) that
//! endpoint composition uses by default, plus the application logger. Their
//! fragments are template files under `blocks/go/gorilla/` in the cache, so
//! only the block documents themselves ship with paver.
//!
//! Each trigger appears in exactly one mapping per block; the registry
//! validates that when a built-in is loaded like any other block.

use paver_core::domain::{
    Block, BlockInformation, BlockMetadata, Contact, TemplateFragment, TriggerMapping, UsageRights,
};

/// Gorilla mux route registrations.
pub const GORILLA_ROUTES: &str = "io.pavedroad.http.routers.gorilla";
/// Gorilla handler functions.
pub const GORILLA_METHODS: &str = "io.pavedroad.http.methods.gorilla";
/// Pre and post hooks around handlers.
pub const GORILLA_HOOKS: &str = "io.pavedroad.http.hooks.gorilla";
/// Standard library application logger.
pub const APPLICATION_LOGGER: &str = "io.pavedroad.core.loggers.application";

const GORILLA_BASE_DIRECTORY: &str = "blocks/go/gorilla";
const LOGGER_BASE_DIRECTORY: &str = "blocks/go/loggers";

const GORILLA_IMPORTS: [&str; 3] = [
    "github.com/gorilla/mux",
    "github.com/gorilla/handlers",
    "_ \"github.com/lib/pq\"",
];

/// Every built-in block, in a stable order.
pub fn builtin_blocks() -> Vec<Block> {
    vec![gorilla_routes(), gorilla_methods(), gorilla_hooks(), application_logger()]
}

pub fn gorilla_routes() -> Block {
    let mut block = gorilla_block(
        GORILLA_ROUTES,
        "EndpointsBlock",
        &["gorilla", "router", "http"],
        "Gorilla mux routes for each endpoint method",
    );
    block.imports = GORILLA_IMPORTS.iter().map(|i| (*i).to_string()).collect();
    block.http_mappings = vec![
        mapping(&["GET", "HEAD", "DELETE", "PATCH", "PUT"], "keyed_route.tpl"),
        mapping(&["LIST"], "list_route.tpl"),
        mapping(&["POST", "TRACE"], "non_keyed_route.tpl"),
        mapping(&["OPTIONS"], "options_route.tpl"),
    ];
    block
}

pub fn gorilla_methods() -> Block {
    let mut block = gorilla_block(
        GORILLA_METHODS,
        "EndpointsBlock",
        &["gorilla", "methods", "http"],
        "Gorilla handler functions for each endpoint method",
    );
    block.imports = GORILLA_IMPORTS.iter().map(|i| (*i).to_string()).collect();
    block.http_mappings = vec![
        mapping(&["GET", "HEAD", "DELETE", "PATCH", "PUT"], "keyed_method.tpl"),
        mapping(&["LIST"], "list_method.tpl"),
        mapping(&["OPTIONS", "TRACE"], "non_keyed_method.tpl"),
        mapping(&["POST"], "post_method.tpl"),
    ];
    block
}

pub fn gorilla_hooks() -> Block {
    let mut block = gorilla_block(
        GORILLA_HOOKS,
        "HooksBlock",
        &["gorilla", "methods", "hooks", "http"],
        "Pre and post processing hooks for Gorilla handlers",
    );
    block.http_mappings = vec![
        mapping(
            &["GET", "HEAD", "DELETE", "PUT", "PATCH", "OPTIONS"],
            "method-keyed-hooks.tpl",
        ),
        mapping(&["POST", "TRACE", "CONNECT"], "method-hooks.tpl"),
        mapping(&["LIST"], "method-list-hooks.tpl"),
    ];
    block
}

pub fn application_logger() -> Block {
    let mut block = Block::new(APPLICATION_LOGGER);
    block.api_version = "v1beta".into();
    block.kind = "LoggerBlock".into();
    block.family = "pavedroad/loggers".into();
    block.language = "go".into();
    block.base_directory = LOGGER_BASE_DIRECTORY.into();
    block.metadata = metadata(&["logging", "application"], "Application logger");
    block.usage_rights = usage_rights();
    block.imports = vec!["log".into(), "os".into()];
    block
}

fn gorilla_block(id: &str, kind: &str, labels: &[&str], title: &str) -> Block {
    let mut block = Block::new(id);
    block.api_version = "v1beta".into();
    block.kind = kind.into();
    block.family = "gorilla/mux".into();
    block.language = "go".into();
    block.base_directory = GORILLA_BASE_DIRECTORY.into();
    block.metadata = metadata(labels, title);
    block.usage_rights = usage_rights();
    block
}

fn mapping(triggers: &[&str], template: &str) -> TriggerMapping {
    TriggerMapping::new(triggers.iter().copied(), TemplateFragment::new(template))
}

fn metadata(labels: &[&str], title: &str) -> BlockMetadata {
    let labels: Vec<String> = labels.iter().map(|l| (*l).to_string()).collect();
    BlockMetadata {
        tags: labels.clone(),
        labels,
        information: BlockInformation {
            title: title.into(),
            description: title.into(),
            contact: Contact {
                author: "John Scharber".into(),
                organization: "PavedRoad".into(),
                email: "support@pavedroad.io".into(),
                website: "www.pavedroad.io".into(),
                support: "pavedroad-io.slack.com".into(),
            },
        },
    }
}

fn usage_rights() -> UsageRights {
    UsageRights {
        terms_of_service: "As is".into(),
        licenses: "Apache 2".into(),
        ..UsageRights::default()
    }
}

//! Command implementations for `authctl`.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use authority_broker::ChoiceAuthorityService;
use authority_config::{Config, TomlFormReader};
use authority_model::FieldKey;
use authority_plugins::PluginRegistry;

use crate::cli::{LabelArgs, LookupArgs, SourceArgs};
use crate::summary::{print_choices_page, print_registry_summary};

/// Wire a service from the on-disk configuration. The CLI registers no
/// in-process backends; only value-pairs and vocabulary sources declared
/// in the config are available.
fn build_service(source: &SourceArgs) -> anyhow::Result<ChoiceAuthorityService> {
    let config = Config::load(&source.config)
        .with_context(|| format!("loading configuration from {}", source.config.display()))?;
    let forms = TomlFormReader::load(&source.forms)
        .with_context(|| format!("loading form definitions from {}", source.forms.display()))?;
    Ok(ChoiceAuthorityService::new(
        config,
        Arc::new(forms),
        PluginRegistry::new(),
    ))
}

/// Build the registry eagerly and report what it contains. Returns an
/// error when any forms-referenced backend is missing.
pub fn run_doctor(source: &SourceArgs) -> anyhow::Result<()> {
    let service = build_service(source)?;
    service.initialize().context("building authority registry")?;
    let summary = service.summary()?;
    let authorities = service.authority_names()?;
    info!(
        bindings = summary.bindings,
        authorities = summary.authorities,
        "authority registry built"
    );
    print_registry_summary(&summary, &authorities, &service)?;
    Ok(())
}

pub fn run_lookup(args: &LookupArgs) -> anyhow::Result<()> {
    let service = build_service(&args.source)?;
    let field = FieldKey::from_dotted(&args.field);
    let choices = if args.best {
        service.best_match(
            &field,
            &args.query,
            args.dso.into(),
            args.collection.as_deref(),
            None,
        )?
    } else {
        service.matches(
            &field,
            &args.query,
            args.dso.into(),
            args.collection.as_deref(),
            args.start,
            args.limit,
            None,
        )?
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&choices)?);
    } else {
        print_choices_page(&choices);
    }
    Ok(())
}

pub fn run_label(args: &LabelArgs) -> anyhow::Result<()> {
    let service = build_service(&args.source)?;
    let field = FieldKey::from_dotted(&args.field);
    let label = service.label(
        &field,
        args.dso.into(),
        args.collection.as_deref(),
        &args.key,
        None,
    )?;
    println!("{label}");
    Ok(())
}

//! cxxdoc CLI - Command-line interface for the cxxdoc C++ declaration domain

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cxxdoc_core::domain::XRefRole;
use cxxdoc_core::project::Resolution;
use cxxdoc_core::{BuildReport, CppDomain, DocContext, DomainConfig, ObjectKind, Project, RefRole};

#[derive(Parser)]
#[command(name = "cxxdoc")]
#[command(version = cxxdoc_core::VERSION)]
#[command(about = "Parse, register and cross-reference C++ declarations", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single declaration and show its text form, identifier and signature
    Parse {
        /// Object kind (class, function, member or type)
        kind: String,

        /// Declaration text, e.g. "void foo(int x = 0) const"
        declaration: String,

        /// Parent scope to describe the declaration in
        #[arg(long)]
        scope: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build a project and resolve one reference against it
    Resolve {
        /// Path to the project manifest
        manifest: PathBuf,

        /// Reference role (class, func, member or type)
        role: String,

        /// Reference target, e.g. "Widget::draw"
        target: String,

        /// Scope the reference is written in
        #[arg(long)]
        scope: Option<String>,

        /// Domain configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build a project: register all objects, then resolve all references
    Build {
        /// Path to the project manifest
        manifest: PathBuf,

        /// Print the build report as JSON
        #[arg(long)]
        json: bool,

        /// Domain configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            kind,
            declaration,
            scope,
            json,
        } => {
            parse_declaration(&kind, &declaration, scope.as_deref(), json)?;
        }

        Commands::Resolve {
            manifest,
            role,
            target,
            scope,
            config,
        } => {
            resolve_reference(&manifest, &role, &target, scope.as_deref(), config.as_deref())?;
        }

        Commands::Build {
            manifest,
            json,
            config,
        } => {
            build_project(&manifest, json, config.as_deref())?;
        }
    }

    Ok(())
}

/// Initialize logging: warnings by default, debug with `--verbose`, `RUST_LOG` wins
fn init_logging(verbose: bool) {
    let default = if verbose { "cxxdoc_core=debug,cxxdoc=debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn object_kind(name: &str) -> Result<ObjectKind> {
    ObjectKind::from_name(name).ok_or_else(|| {
        anyhow::anyhow!("Unknown object kind '{name}', expected one of: class, function, member, type")
    })
}

fn ref_role(name: &str) -> Result<RefRole> {
    RefRole::from_name(name).ok_or_else(|| {
        anyhow::anyhow!("Unknown reference role '{name}', expected one of: class, func, member, type")
    })
}

fn load_config(path: Option<&Path>) -> Result<DomainConfig> {
    match path {
        Some(path) => DomainConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None => Ok(DomainConfig::default()),
    }
}

fn load_and_build(manifest: &Path, config: Option<&Path>) -> Result<(CppDomain, BuildReport)> {
    let project = Project::load(manifest)
        .with_context(|| format!("Failed to load project '{}'", manifest.display()))?;
    let mut domain = CppDomain::with_config(load_config(config)?);
    let report = project.build(&mut domain);
    tracing::debug!(
        manifest = %manifest.display(),
        documents = project.documents.len(),
        objects = domain.len(),
        "project loaded"
    );
    Ok((domain, report))
}

/// Parse one declaration and print what the domain makes of it
fn parse_declaration(kind: &str, declaration: &str, scope: Option<&str>, json: bool) -> Result<()> {
    let kind = object_kind(kind)?;
    let mut ctx = DocContext::new("cli");
    if let Some(scope) = scope {
        ctx = ctx
            .with_namespace(scope)
            .map_err(|e| anyhow::anyhow!("Invalid scope:\n{e}"))?;
    }

    let mut domain = CppDomain::new();
    let described = domain
        .describe(&ctx, kind, declaration)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    if json {
        let value = serde_json::json!({
            "kind": described.kind,
            "text": described.declaration.to_string(),
            "fullname": described.fullname,
            "identifier": described.anchor,
            "index": described.index_text,
            "signature": described.signature,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("text:       {}", described.declaration);
        println!("fullname:   {}", described.fullname);
        println!("identifier: {}", described.anchor);
        println!("signature:  {}", described.signature);
        println!("index:      {}", described.index_text);
    }

    Ok(())
}

/// Build a project and resolve a single reference
fn resolve_reference(
    manifest: &Path,
    role: &str,
    target: &str,
    scope: Option<&str>,
    config: Option<&Path>,
) -> Result<()> {
    let role = ref_role(role)?;
    let (domain, report) = load_and_build(manifest, config)?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let parent = scope
        .map(cxxdoc_core::parse_type)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid scope:\n{e}"))?;
    let link = XRefRole::with_config(role, domain.config()).process_link(target, target, false);

    match domain
        .resolve_xref(role, &link.target, parent.as_ref())
        .map_err(|e| anyhow::anyhow!("{e}"))?
    {
        Some(found) => {
            println!(
                "{} -> {} ({}#{}, {})",
                link.title, found.fullname, found.docname, found.anchor, found.kind
            );
            Ok(())
        }
        None => Err(anyhow::anyhow!(
            "Could not resolve {role} reference '{}'",
            link.target
        )),
    }
}

/// Build a project and print the object index and reference outcomes
fn build_project(manifest: &Path, json: bool, config: Option<&Path>) -> Result<()> {
    let (domain, report) = load_and_build(manifest, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for collision in domain.collisions() {
        eprintln!(
            "warning: '{}' was registered in '{}' and again in '{}'",
            collision.fullname, collision.previous.docname, collision.replacement.docname
        );
    }

    println!("Objects ({}):", domain.len());
    for record in domain.objects() {
        println!(
            "  {:<40} {:<8} {}#{}",
            record.fullname,
            record.kind.as_str(),
            record.docname,
            record.anchor
        );
    }

    if !report.references.is_empty() {
        println!();
        println!("References ({}):", report.references.len());
        for reference in &report.references {
            let outcome = match &reference.resolution {
                Resolution::Resolved(found) => format!("{}#{}", found.docname, found.anchor),
                Resolution::Unresolved => "unresolved".to_string(),
                Resolution::Error { message } => format!("error: {message}"),
            };
            println!(
                "  [{}] {}:{} -> {}",
                reference.docname, reference.role, reference.target, outcome
            );
        }
    }

    let unresolved = report.unresolved().count();
    println!();
    println!(
        "{} objects, {} references ({} unresolved), {} warnings",
        report.objects.len(),
        report.references.len(),
        unresolved,
        report.warnings.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommand_arguments() {
        let cli = Cli::try_parse_from([
            "cxxdoc",
            "parse",
            "function",
            "void foo(int x = 0) const",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Parse { kind, json, .. } => {
                assert_eq!(kind, "function");
                assert!(json);
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(object_kind("enum").is_err());
        assert!(ref_role("function").is_err());
        assert_eq!(ref_role("func").unwrap(), RefRole::Func);
    }

    #[test]
    fn build_from_manifest_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[document]]
name = "api"

[[document.object]]
kind = "class"
signature = "Widget"

[[document.reference]]
role = "class"
target = "Widget"
"#
        )
        .unwrap();

        let (domain, report) = load_and_build(file.path(), None).unwrap();
        assert_eq!(domain.len(), 1);
        assert_eq!(report.resolved().count(), 1);
        assert!(resolve_reference(file.path(), "class", "Widget", None, None).is_ok());
        assert!(resolve_reference(file.path(), "class", "Gadget", None, None).is_err());
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).is_err());
        assert_eq!(load_config(None).unwrap(), DomainConfig::default());
    }
}

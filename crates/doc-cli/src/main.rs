use std::process::exit;
use std::sync::Arc;

use doc_core::{DocumentationType, GenerationEngine, NewChangeLogEntry};
use doc_persistence::{PgArtifactStore, PgChangeLogStore, PgPool, PgSchemaSource};
use doc_renderers::DefaultRenderers;

const USAGE: &str = "Uso:
  doc-cli generate --type <documentation_type> [--as <caller>]
  doc-cli list
  doc-cli show --type <documentation_type>
  doc-cli record-change --bereich <area> --description <text> [--entity <name>]";

#[derive(Debug, PartialEq)]
enum Command {
    Generate { doc_type: DocumentationType, caller: Option<String> },
    List,
    Show { doc_type: DocumentationType },
    RecordChange { entry: NewChangeLogEntry },
}

/// Valor de `--flag <valor>` en `args`.
fn flag(args: &[String], name: &str) -> Option<String> {
    args.iter().position(|a| a == name).and_then(|i| args.get(i + 1)).cloned()
}

fn parse_type(args: &[String]) -> Result<DocumentationType, String> {
    let raw = flag(args, "--type").ok_or("falta --type")?;
    raw.parse().map_err(|e: doc_core::EngineError| e.to_string())
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let rest = args.get(2..).unwrap_or_default();
    match args.get(1).map(String::as_str) {
        Some("generate") => Ok(Command::Generate { doc_type: parse_type(rest)?,
                                                   caller: flag(rest, "--as") }),
        Some("list") => Ok(Command::List),
        Some("show") => Ok(Command::Show { doc_type: parse_type(rest)? }),
        Some("record-change") => {
            let bereich = flag(rest, "--bereich").ok_or("falta --bereich")?;
            let description = flag(rest, "--description").ok_or("falta --description")?;
            let mut entry = NewChangeLogEntry::new(bereich, description);
            if let Some(entity) = flag(rest, "--entity") {
                entry = entry.affecting(entity);
            }
            Ok(Command::RecordChange { entry })
        }
        _ => Err("comando desconocido".into()),
    }
}

fn engine(pool: &PgPool) -> Result<GenerationEngine, doc_core::EngineError> {
    GenerationEngine::builder().artifacts(Arc::new(PgArtifactStore::new(pool.clone())))
                               .change_log(Arc::new(PgChangeLogStore::new(pool.clone())))
                               .schema_source(Arc::new(PgSchemaSource::new(pool.clone())))
                               .renderers(Arc::new(DefaultRenderers))
                               .build()
}

async fn run(command: Command, pool: PgPool) -> i32 {
    let engine = match engine(&pool) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("[doc-cli] engine: {e}");
            return 5;
        }
    };
    match command {
        Command::Generate { doc_type, caller } => match engine.generate(doc_type, caller.as_deref()).await {
            Ok(outcome) => {
                println!("{}", serde_json::json!(outcome));
                0
            }
            Err(e) => {
                eprintln!("[doc-cli generate] {e}");
                5
            }
        },
        Command::List => match engine.list().await {
            Ok(artifacts) => {
                for a in artifacts {
                    println!("{:<24} v{:<4} {:<10} {}",
                             a.documentation_type,
                             a.version_number.unwrap_or(1),
                             a.status.as_str(),
                             a.last_generated_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into()));
                }
                0
            }
            Err(e) => {
                eprintln!("[doc-cli list] {e}");
                5
            }
        },
        Command::Show { doc_type } => match engine.artifact(doc_type).await {
            Ok(Some(a)) => {
                println!("{}", a.content_markdown.unwrap_or_default());
                0
            }
            Ok(None) => {
                eprintln!("[doc-cli show] sin documentación para {doc_type}");
                4
            }
            Err(e) => {
                eprintln!("[doc-cli show] {e}");
                5
            }
        },
        Command::RecordChange { entry } => match PgChangeLogStore::new(pool).record(entry).await {
            Ok(saved) => {
                println!("{}", saved.id);
                0
            }
            Err(e) => {
                eprintln!("[doc-cli record-change] {e}");
                5
            }
        },
    }
}

#[tokio::main]
async fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    doc_persistence::init_dotenv();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
                             .init();

    let args: Vec<String> = std::env::args().collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            exit(2);
        }
    };

    let pool = match doc_persistence::build_pool_from_env() {
        Ok(Some(p)) => p,
        Ok(None) => {
            eprintln!("[doc-cli] requiere DATABASE_URL para operar contra backend persistente");
            exit(4);
        }
        Err(e) => {
            eprintln!("[doc-cli] pool error: {e}");
            exit(5);
        }
    };
    exit(run(command, pool).await);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        std::iter::once("doc-cli").chain(s.split_whitespace()).map(str::to_string).collect()
    }

    #[test]
    fn parses_generate_with_caller() {
        assert_eq!(parse_args(&args("generate --type master_data --as ops")).unwrap(),
                   Command::Generate { doc_type: DocumentationType::MasterData,
                                       caller: Some("ops".into()) });
    }

    #[test]
    fn rejects_unknown_type_and_missing_flags() {
        assert_eq!(parse_args(&args("generate --type nope")).unwrap_err(), "Unknown documentation type: nope");
        assert!(parse_args(&args("show")).is_err());
        assert!(parse_args(&args("")).is_err());
    }

    #[test]
    fn parses_record_change() {
        let cmd = parse_args(&args("record-change --bereich database --description Added --entity Building")).unwrap();
        assert_eq!(cmd,
                   Command::RecordChange { entry: NewChangeLogEntry::new("database", "Added").affecting("Building") });
    }
}

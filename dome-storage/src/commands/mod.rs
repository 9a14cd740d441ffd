//! Command parsing and execution.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dome_storage_repository::{UnitOwnersStore, UnitStatusStore};
use dome_storage_shared::{OwnerPatch, ProjectStorageData, SaleStatus, UnitOwner};
use tracing::info;

use crate::config::Dependencies;
use crate::errors::CliError;

const ENV_HELP: &str = "\
Environment:
  DOME_STORAGE_DIR  Directory holding the project documents (default: ./dome-storage)
  DOME_BACKUP_DIR   Directory backups are written to (default: .)
  LOG_FORMAT        pretty | json
  RUST_LOG          Log filter";

/// Command line of the operator tool.
#[derive(Debug, Parser)]
#[command(name = "dome-storage", version)]
#[command(about = "Export, import, back up and edit Dome project storage")]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the project backup document
    Export { project_id: String },
    /// Restore a backup document
    Import { file: PathBuf },
    /// Write dome-<project>-backup-<millis>.json into the backup directory
    Backup { project_id: String },
    /// Delete both project documents
    Clear { project_id: String },
    /// Summarize owners and statuses
    Show { project_id: String },
    /// Record a unit's sale status (DISPONIBLE | bloqueado | reservado | VENDIDO)
    SetStatus {
        project_id: String,
        unit_id: String,
        status: SaleStatus,
        changed_by: String,
        notes: Option<String>,
    },
    /// Assign an owner to a unit
    AssignOwner {
        project_id: String,
        unit_id: String,
        name: String,
        email: String,
        phone: String,
        #[arg(value_name = "TYPE")]
        owner_type: String,
    },
    /// Merge a JSON patch (name, email, phone, type) into a unit's owner
    UpdateOwner {
        project_id: String,
        unit_id: String,
        #[arg(value_name = "PATCH_JSON", value_parser = parse_patch)]
        patch: OwnerPatch,
    },
    /// Remove a unit's owner
    RemoveOwner { project_id: String, unit_id: String },
}

fn parse_patch(value: &str) -> Result<OwnerPatch, serde_json::Error> {
    serde_json::from_str(value)
}

impl Command {
    /// Run the command, writing its report to `out`.
    pub fn execute(&self, deps: &Dependencies, out: &mut impl Write) -> Result<(), CliError> {
        match self {
            Self::Export { project_id } => {
                let data = deps.manager.export_project_data(project_id)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&data)?)?;
            }
            Self::Import { file } => {
                let contents = fs::read_to_string(file)?;
                let data: ProjectStorageData = serde_json::from_str(&contents)?;
                deps.manager.import_project_data(&data)?;
                writeln!(
                    out,
                    "imported {} owners and {} statuses into {}",
                    data.owners.len(),
                    data.statuses.len(),
                    data.project_id
                )?;
            }
            Self::Backup { project_id } => {
                let file_name = deps
                    .manager
                    .download_project_as_json(project_id, &deps.sink)?;
                writeln!(out, "{}", deps.sink.dir().join(file_name).display())?;
            }
            Self::Clear { project_id } => {
                deps.manager.clear_project_data(project_id)?;
                writeln!(out, "cleared {}", project_id)?;
            }
            Self::Show { project_id } => {
                let owners = UnitOwnersStore::open(deps.backend.clone(), project_id.as_str())?;
                let statuses = UnitStatusStore::open(deps.backend.clone(), project_id.as_str())?;
                writeln!(out, "project {}", project_id)?;
                writeln!(out, "  owners: {}", owners.len())?;
                writeln!(out, "  statuses: {}", statuses.len())?;
                for (status, count) in statuses.status_counts() {
                    writeln!(out, "    {}: {}", status, count)?;
                }
            }
            Self::SetStatus {
                project_id,
                unit_id,
                status,
                changed_by,
                notes,
            } => {
                let mut store = UnitStatusStore::open(deps.backend.clone(), project_id.as_str())?;
                store.update_status(unit_id, *status, changed_by, notes.as_deref())?;
                info!(project_id = %project_id, unit_id = %unit_id, status = %status, "Status updated");
                writeln!(out, "{} {} -> {}", project_id, unit_id, status)?;
            }
            Self::AssignOwner {
                project_id,
                unit_id,
                name,
                email,
                phone,
                owner_type,
            } => {
                let mut store = UnitOwnersStore::open(deps.backend.clone(), project_id.as_str())?;
                store.add_owner(unit_id, UnitOwner::new(name, email, phone, owner_type))?;
                writeln!(out, "{} {} assigned to {}", project_id, unit_id, name)?;
            }
            Self::UpdateOwner {
                project_id,
                unit_id,
                patch,
            } => {
                let mut store = UnitOwnersStore::open(deps.backend.clone(), project_id.as_str())?;
                if store.update_owner(unit_id, patch)? {
                    writeln!(out, "{} {} owner updated", project_id, unit_id)?;
                } else {
                    writeln!(out, "{} {} has no owner", project_id, unit_id)?;
                }
            }
            Self::RemoveOwner {
                project_id,
                unit_id,
            } => {
                let mut store = UnitOwnersStore::open(deps.backend.clone(), project_id.as_str())?;
                if store.remove_owner(unit_id)? {
                    writeln!(out, "{} {} owner removed", project_id, unit_id)?;
                } else {
                    writeln!(out, "{} {} has no owner", project_id, unit_id)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use dome_storage_repository::{DirectorySink, MemoryBackend, StorageBackend};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("dome-storage").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    fn deps(dir: &TempDir) -> Dependencies {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        Dependencies::with_backend(backend, DirectorySink::new(dir.path()))
    }

    fn run(deps: &Dependencies, args: &[&str]) -> String {
        let mut out = Vec::new();
        parse(args).unwrap().execute(deps, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_set_status() {
        let command = parse(&["set-status", "resi", "A101", "VENDIDO", "agent9", "closed"]).unwrap();
        assert_eq!(
            command,
            Command::SetStatus {
                project_id: "resi".to_string(),
                unit_id: "A101".to_string(),
                status: SaleStatus::Sold,
                changed_by: "agent9".to_string(),
                notes: Some("closed".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let err = parse(&["set-status", "resi", "A101", "ALQUILADO", "agent9"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("Unknown unit status: ALQUILADO"));
    }

    #[test]
    fn test_parse_rejects_unknown_patch_field() {
        let err = parse(&["update-owner", "resi", "A101", r#"{"nickname":"Lu"}"#]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_usage_errors() {
        assert!(parse(&[]).is_err());
        assert_eq!(
            parse(&["export"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse(&["export", "resi", "park"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            parse(&["frobnicate", "resi"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
    }

    #[test]
    fn test_usage_errors_exit_with_code_2() {
        assert_eq!(parse(&["export"]).unwrap_err().exit_code(), 2);
        assert_eq!(parse(&["--help"]).unwrap_err().exit_code(), 0);
    }

    #[test]
    fn test_status_and_show() {
        let dir = TempDir::new().unwrap();
        let deps = deps(&dir);

        run(&deps, &["set-status", "resi", "A101", "reservado", "agent7"]);
        run(&deps, &["set-status", "resi", "A102", "VENDIDO", "agent9"]);
        run(
            &deps,
            &["assign-owner", "resi", "A102", "Ana", "ana@example.com", "600", "persona"],
        );

        let report = run(&deps, &["show", "resi"]);
        assert!(report.contains("owners: 1"));
        assert!(report.contains("statuses: 2"));
        assert!(report.contains("reservado: 1"));
        assert!(report.contains("VENDIDO: 1"));
    }

    #[test]
    fn test_update_and_remove_owner() {
        let dir = TempDir::new().unwrap();
        let deps = deps(&dir);
        run(
            &deps,
            &["assign-owner", "resi", "A101", "Ana", "ana@example.com", "600", "persona"],
        );

        let report = run(&deps, &["update-owner", "resi", "A101", r#"{"phone":"611"}"#]);
        assert!(report.contains("owner updated"));

        let owners = UnitOwnersStore::open(deps.backend.clone(), "resi").unwrap();
        assert_eq!(owners.get("A101").unwrap().phone, "611");
        assert_eq!(owners.get("A101").unwrap().owner_type, "persona");

        assert!(run(&deps, &["remove-owner", "resi", "A101"]).contains("owner removed"));
        assert!(run(&deps, &["remove-owner", "resi", "A101"]).contains("has no owner"));
    }

    #[test]
    fn test_backup_clear_import() {
        let dir = TempDir::new().unwrap();
        let deps = deps(&dir);
        run(&deps, &["set-status", "resi", "A101", "bloqueado", "admin"]);

        let path = run(&deps, &["backup", "resi"]);
        let path = PathBuf::from(path.trim());
        assert!(path.is_file());

        run(&deps, &["clear", "resi"]);
        assert!(run(&deps, &["show", "resi"]).contains("statuses: 0"));

        let path = path.to_string_lossy().into_owned();
        let report = run(&deps, &["import", path.as_str()]);
        assert!(report.contains("imported 0 owners and 1 statuses into resi"));
        assert!(run(&deps, &["show", "resi"]).contains("bloqueado: 1"));
    }
}

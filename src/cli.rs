//! Command-line interface definitions.
//!
//! One subcommand per module; each invocation performs exactly one module
//! run and prints the result document as JSON to stdout.

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::error::ItsiError;
use crate::modules::episode_comment::EpisodeCommentParams;
use crate::modules::glass_table::{GlassTableParams, Sharing, State};
use crate::modules::glass_table_info::{GlassTableInfoParams, SortDir};

/// Declarative CLI for Splunk ITSI glass tables and episode comments.
#[derive(Parser)]
#[command(name = "itsictl")]
#[command(version)]
#[command(about = "Manage Splunk ITSI glass tables and episode comments", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Compute and report the predicted effect without performing the
    /// mutating call (check mode)
    #[arg(long, global = true)]
    pub check: bool,

    /// The module invocation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available module invocations.
#[derive(Subcommand)]
pub enum Command {
    /// Create, update, or delete a glass table
    GlassTable(GlassTableArgs),

    /// Read a single glass table or list glass tables
    GlassTableInfo(GlassTableInfoArgs),

    /// Add a comment to an episode (notable event group)
    EpisodeComment(EpisodeCommentArgs),
}

/// Arguments for the glass-table subcommand.
#[derive(Args)]
pub struct GlassTableArgs {
    /// Glass table _key; required for delete, targets an update when
    /// present, creates when omitted (titles are not unique)
    #[arg(long)]
    pub glass_table_id: Option<String>,

    /// Title of the glass table (required when creating)
    #[arg(long)]
    pub title: Option<String>,

    /// Description text for the glass table
    #[arg(long)]
    pub description: Option<String>,

    /// Raw JSON definition object (required when creating)
    #[arg(long, conflicts_with = "definition_file")]
    pub definition: Option<String>,

    /// Path to a file containing the JSON definition object
    #[arg(long)]
    pub definition_file: Option<std::path::PathBuf>,

    /// Sharing level, stored at acl.sharing
    #[arg(long, value_enum)]
    pub sharing: Option<Sharing>,

    /// Desired state of the glass table
    #[arg(long, value_enum, default_value = "present")]
    pub state: State,
}

impl GlassTableArgs {
    /// Converts CLI arguments into module parameters.
    ///
    /// # Errors
    ///
    /// Returns `ItsiError::Validation` when the definition is not a JSON
    /// object, or a config error when the definition file is unreadable.
    pub fn into_params(self) -> Result<GlassTableParams, ItsiError> {
        let definition = match (self.definition, self.definition_file) {
            (Some(raw), _) => Some(parse_definition(&raw)?),
            (None, Some(path)) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    ItsiError::validation(format!(
                        "cannot read definition file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Some(parse_definition(&raw)?)
            }
            (None, None) => None,
        };

        Ok(GlassTableParams {
            glass_table_id: self.glass_table_id,
            title: self.title,
            description: self.description,
            definition,
            sharing: self.sharing,
            state: self.state,
        })
    }
}

/// Parses a definition argument, rejecting anything but a JSON object.
fn parse_definition(raw: &str) -> Result<Value, ItsiError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ItsiError::validation(format!("definition is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ItsiError::validation("definition must be a JSON object"));
    }
    Ok(value)
}

/// Arguments for the glass-table-info subcommand.
#[derive(Args)]
pub struct GlassTableInfoArgs {
    /// Glass table _key; fetches a single glass table as a one-element list
    #[arg(long)]
    pub glass_table_id: Option<String>,

    /// MongoDB-style JSON filter string, e.g. '{"title": "My Table"}'
    #[arg(long)]
    pub filter: Option<String>,

    /// Comma-separated list of field names to include in the response
    #[arg(long)]
    pub fields: Option<String>,

    /// Maximum number of glass tables to return (page size)
    #[arg(long)]
    pub count: Option<u32>,

    /// Number of results to skip from the start
    #[arg(long)]
    pub offset: Option<u32>,

    /// Field name to sort results by
    #[arg(long)]
    pub sort_key: Option<String>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub sort_dir: Option<SortDir>,
}

impl From<GlassTableInfoArgs> for GlassTableInfoParams {
    fn from(args: GlassTableInfoArgs) -> Self {
        GlassTableInfoParams {
            glass_table_id: args.glass_table_id,
            filter: args.filter,
            fields: args.fields,
            count: args.count,
            offset: args.offset,
            sort_key: args.sort_key,
            sort_dir: args.sort_dir,
        }
    }
}

/// Arguments for the episode-comment subcommand.
#[derive(Args)]
pub struct EpisodeCommentArgs {
    /// The episode _key to add a comment to
    #[arg(long)]
    pub episode_key: String,

    /// The text content of the comment
    #[arg(long)]
    pub comment: String,

    /// Whether this comment is for an episode group (true for ITSI episodes)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub is_group: bool,
}

impl From<EpisodeCommentArgs> for EpisodeCommentParams {
    fn from(args: EpisodeCommentArgs) -> Self {
        EpisodeCommentParams {
            episode_key: args.episode_key,
            comment: args.comment,
            is_group: args.is_group,
        }
    }
}

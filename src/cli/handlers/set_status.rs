use tracing::info;

use super::parse_status;
use crate::cli::commands::SetStatusArgs;
use crate::cli::output::StatusChangeJson;
use crate::io::api_client::TaskApi;
use crate::model::api::StatusUpdate;

pub fn cmd_set_status(
    args: SetStatusArgs,
    api: &dyn TaskApi,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_status(&args.status)?;
    if args.comment.is_empty() {
        return Err("a comment is required to change status".into());
    }
    let update = StatusUpdate {
        id: args.id,
        status,
        comment: args.comment,
    };
    api.update_status(&update)?;
    info!(id = update.id, status = %update.status, "status updated");

    if json {
        let out = StatusChangeJson {
            id: update.id,
            status: update.status,
            comment: update.comment,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("#{} → {}", update.id, update.status.label());
    }
    Ok(())
}

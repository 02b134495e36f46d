use std::path::PathBuf;

use anyhow::Context;
use keylister_core::records::{read_account_roles, write_report};
use keylister_core::{
    AccountRoleEntry, CancelSignal, Inventory, ListerConfig, Orchestrator, RunSummary,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{print_json, print_summary};

pub struct RunOptions {
    pub config: ListerConfig,
    pub account_list_file: PathBuf,
    pub output_file: PathBuf,
    pub json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    output_file: String,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

/// Validate inputs, inventory every account, then write the report.
///
/// Everything that can be checked locally is checked before the first AWS
/// call, and the report is only written once enumeration has succeeded.
pub fn run(opts: RunOptions) -> anyhow::Result<()> {
    opts.config.validate()?;

    let entries = read_account_roles(&opts.account_list_file).with_context(|| {
        format!(
            "error when reading account list file {}",
            opts.account_list_file.display()
        )
    })?;
    info!(accounts = entries.len(), "account list loaded");

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let inventory = rt.block_on(inventory_accounts(&opts.config, &entries))?;

    write_report(&opts.output_file, &inventory.report).with_context(|| {
        format!(
            "error when writing records to {}",
            opts.output_file.display()
        )
    })?;
    info!(
        output_file = %opts.output_file.display(),
        rows = inventory.report.len(),
        "report written"
    );

    let summary = RunSummary::from_inventory(&inventory);
    if opts.json {
        print_json(&JsonOutput {
            output_file: opts.output_file.display().to_string(),
            summary: &summary,
        })?;
    } else {
        print_summary(&summary);
    }
    Ok(())
}

async fn inventory_accounts(
    config: &ListerConfig,
    entries: &[AccountRoleEntry],
) -> anyhow::Result<Inventory> {
    let cancel = CancelSignal::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping");
                cancel.cancel();
            }
        })
    };

    let provider = keylister_aws::connect(config).await;
    let orchestrator = Orchestrator::new(provider, config, cancel)?;
    let result = orchestrator.run(entries).await;
    interrupt.abort();

    result.context("access key inventory failed")
}

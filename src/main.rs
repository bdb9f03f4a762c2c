//! Tooling to enable access logging across AWS resources from a CLI.
//!
//! Access logging can be turned on for S3 buckets (from a list in a file)
//! and for Elastic Load Balancers (discovered across a region). A scan is
//! also available to locate buckets which are missing logging entirely.
//!
//! Credentials must be provided via guidelines in the [AWS Documentation]
//! (https://docs.aws.amazon.com/cli/latest/userguide/cli-environment.html).
#[macro_use]
extern crate log as logger;

mod batch;
mod cli;
mod log;
mod provider;
mod session;
mod types;
mod walker;

mod buckets;
mod lbs;
mod scan;

#[tokio::main(flavor = "current_thread")]
async fn main() -> types::UtilResult<()> {
    // build the CLI and grab all arguments
    let args = cli::build().get_matches();

    // delegate to the cli mod
    cli::exec(&args).await
}

/*!
 * Turn Alternator - Main Entry Point
 *
 * Two workers print their multiplication tables in strict alternation:
 * worker A the table of 2, worker B the table of 4, ten lines each.
 */

use tracing::info;
use turn_alternator::{init_tracing, Driver, DriverConfig, OutputFormat};

fn main() -> miette::Result<()> {
    init_tracing();

    let config = DriverConfig::from_env()?;
    let text = config.output == OutputFormat::Text;

    if text {
        println!("synchronized threads printing tables\n");
    }

    let report = Driver::new(config).run()?;

    if text {
        println!("\nboth threads completed");
    }
    info!(
        run_id = %report.run_id,
        actions = report.total_actions(),
        "run finished"
    );
    Ok(())
}

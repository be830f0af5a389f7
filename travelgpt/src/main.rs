use std::cell::RefCell;

use clap::{Args, Parser, Subcommand};
use miette::{miette, IntoDiagnostic, Result};
use shared::controller::{FormInput, FormView, ItineraryController, SubmitOutcome};
use shared::view::Node;
use shared::ItineraryEnvelope;
use tracing_subscriber::EnvFilter;
use travelgpt::{HttpTransport, Planner, ProviderConfig};

#[derive(Parser, Debug)]
#[command(name = "travelgpt-cli", about = "Plan trips from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an itinerary in-process and print the response envelope
    Plan {
        #[command(flatten)]
        trip: TripArgs,
        #[command(flatten)]
        providers: ProviderConfig,
    },
    /// Submit the trip to an itinerary service and print each result-area update as HTML
    Request {
        #[command(flatten)]
        trip: TripArgs,
        /// Start from the sample trip instead of the given fields
        #[arg(long)]
        sample: bool,
        #[arg(long, env = "TRAVELGPT_ENDPOINT", default_value = "http://localhost:7860")]
        endpoint: String,
    },
}

/// Raw form fields. Blank values get the same defaults as the web form.
#[derive(Args, Debug, Clone)]
struct TripArgs {
    #[arg(long, default_value = "")]
    destination: String,
    #[arg(long, default_value = "")]
    days: String,
    #[arg(long, default_value = "")]
    interests: String,
}

impl From<TripArgs> for FormInput {
    fn from(args: TripArgs) -> Self {
        FormInput {
            destination: args.destination,
            days: args.days,
            interests: args.interests,
        }
    }
}

struct TerminalView {
    form: RefCell<FormInput>,
}

impl FormView for TerminalView {
    fn read_form(&self) -> FormInput {
        self.form.borrow().clone()
    }

    fn write_form(&self, input: &FormInput) {
        *self.form.borrow_mut() = input.clone();
    }

    fn show(&self, node: Node) {
        println!("{}", node.to_html());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan { trip, providers } => {
            let request = FormInput::from(trip).to_request();
            let planner = Planner::from_config(&providers)?;

            let envelope = ItineraryEnvelope::success(planner.plan(&request).await);
            println!(
                "{}",
                serde_json::to_string_pretty(&envelope).into_diagnostic()?
            );
        }
        Command::Request {
            trip,
            sample,
            endpoint,
        } => {
            let view = TerminalView {
                form: RefCell::new(trip.into()),
            };
            let controller = ItineraryController::new(HttpTransport::new(&endpoint)?, view);

            if sample {
                controller.populate_sample();
            }

            if controller.submit().await == SubmitOutcome::Failed {
                return Err(miette!("itinerary request to {endpoint} failed"));
            }
        }
    }

    Ok(())
}

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use iris_predict::shell::{Command, HELP};
use iris_predict::view::{render, render_inputs, render_outcome};
use iris_predict::{
    ClientConfig, ClientError, FeatureVector, InputController, InteractionStateMachine,
    PredictionClient, PredictionResult, Predictor, SubmitTicket,
};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(author, version, about = "Interactive client for the iris species classification service", long_about = None)]
struct Args {
    /// Base URL of the classification service [env: IRIS_BACKEND_URL] [default: http://localhost:8000]
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Give up on a request after this many seconds (default: no client-side timeout)
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Initial sepal length in cm
    #[arg(long, default_value_t = 5.1)]
    sepal_length: f64,

    /// Initial sepal width in cm
    #[arg(long, default_value_t = 3.5)]
    sepal_width: f64,

    /// Initial petal length in cm
    #[arg(long, default_value_t = 1.4)]
    petal_length: f64,

    /// Initial petal width in cm
    #[arg(long, default_value_t = 0.2)]
    petal_width: f64,
}

type PendingPrediction = Pin<Box<dyn Future<Output = Result<PredictionResult, ClientError>>>>;

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Resolves once the in-flight prediction finishes; never resolves when idle.
async fn wait_for(pending: &mut Option<PendingPrediction>) -> Result<PredictionResult, ClientError> {
    match pending.as_mut() {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}

/// Follow-up line for a submission that was stopped before reaching the network
fn rejection_hint(err: &ClientError) -> Option<&'static str> {
    err.is_local()
        .then_some("Fix the measurements with `set` and run `predict` again.")
}

fn finish(session: &mut InteractionStateMachine, outcome: Result<PredictionResult, ClientError>) {
    session.complete_submit(outcome);
    print!("\n{}", render_outcome(&session.snapshot()));
}

/// Applies one command. Returns `false` when the shell should exit.
fn handle(
    command: Command,
    session: &mut InteractionStateMachine,
    client: &PredictionClient,
    pending: &mut Option<PendingPrediction>,
    backend: &str,
) -> bool {
    match command {
        Command::Set { field, raw } => {
            session.on_field_change(field, &raw);
            print!("{}", render_inputs(&session.snapshot()));
        }
        Command::Step { field, steps } => {
            session.input_mut().step(field, steps);
            print!("{}", render_inputs(&session.snapshot()));
        }
        Command::Predict => match session.begin_submit() {
            SubmitTicket::Busy => println!("A prediction is already in flight, please wait."),
            SubmitTicket::Rejected(err) => {
                print!("{}", render_outcome(&session.snapshot()));
                if let Some(hint) = rejection_hint(&err) {
                    println!("{}", hint);
                }
            }
            SubmitTicket::Started(request) => {
                let client = client.clone();
                *pending = Some(Box::pin(async move { client.predict(&request).await }));
                print!("{}", render_outcome(&session.snapshot()));
            }
        },
        Command::Show => print!("{}", render(&session.snapshot(), backend)),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Nothing => {}
    }
    true
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    iris_predict::init_logger();
    let args = Args::parse();

    let mut config = ClientConfig::from_env().with_timeout(args.timeout_secs.map(Duration::from_secs));
    if let Some(url) = args.backend_url {
        config = config.with_base_url(url);
    }
    let client = PredictionClient::new(&config)
        .with_context(|| format!("Cannot use backend URL '{}'", config.base_url))?;

    let mut session = InteractionStateMachine::new(InputController::new(FeatureVector::new(
        args.sepal_length,
        args.sepal_width,
        args.petal_length,
        args.petal_width,
    )));
    info!("=== Starting Iris Classifier Shell ({}) ===", config.base_url);

    print!("{}", render(&session.snapshot(), &config.base_url));
    println!("\nType `help` for commands.");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<PendingPrediction> = None;

    loop {
        tokio::select! {
            outcome = wait_for(&mut pending), if pending.is_some() => {
                pending = None;
                finish(&mut session, outcome);
                prompt();
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    // Input closed: let an in-flight prediction land before exiting
                    if let Some(future) = pending.take() {
                        let outcome = future.await;
                        finish(&mut session, outcome);
                    }
                    break;
                };

                let keep_going = match line.parse::<Command>() {
                    Ok(command) => handle(command, &mut session, &client, &mut pending, &config.base_url),
                    Err(e) => {
                        println!("{}", e);
                        true
                    }
                };
                if !keep_going {
                    if pending.is_some() {
                        warn!("Exiting with a prediction still in flight");
                    }
                    break;
                }
                prompt();
            }
        }
    }

    info!("=== Shell Closed ===");
    Ok(())
}

//! Command line front end for manual checks against the gateway.

use anyhow::Context;
use cielo::{
    CardBrand, CieloGateway, ClientConfig, CreditCard, Currency, Customer, ExpirationDate,
    Payment, RetryPolicy, Transaction, gateway::mask,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(version, about = "Cielo e-commerce gateway client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a credit card sale
    Create(CreateArgs),
    /// Capture an authorized payment
    Capture(UpdateArgs),
    /// Void a payment
    Void(UpdateArgs),
    /// Query a payment
    Get { payment_id: Uuid },
}

#[derive(Debug, clap::Args)]
struct CreateArgs {
    /// Amount in cents
    #[arg(long)]
    amount: u64,
    #[arg(long)]
    card: String,
    #[arg(long, default_value = "Teste Holder")]
    holder: String,
    /// Expiration as MM/YYYY
    #[arg(long, default_value = "12/2030")]
    expiration: String,
    #[arg(long, default_value = "123")]
    security_code: String,
    #[arg(long, value_enum, default_value_t = Brand::Visa)]
    brand: Brand,
    #[arg(long, default_value_t = 1)]
    installments: u32,
    #[arg(long)]
    capture: bool,
    #[arg(long)]
    soft_descriptor: Option<String>,
    #[arg(long, default_value = "Fulano da Silva")]
    customer: String,
    /// Defaults to a random id
    #[arg(long)]
    order_id: Option<String>,
    /// Reuse to retry a request safely
    #[arg(long)]
    request_id: Option<Uuid>,
    #[arg(long, default_value_t = 3)]
    attempts: u32,
}

#[derive(Debug, clap::Args)]
struct UpdateArgs {
    payment_id: Uuid,
    /// Partial amount in cents
    #[arg(long)]
    amount: Option<u64>,
    #[arg(long)]
    request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Brand {
    Visa,
    Master,
    Amex,
    Elo,
    Aura,
    Jcb,
    Diners,
    Discover,
    Hipercard,
    Hiper,
}

impl From<Brand> for CardBrand {
    fn from(value: Brand) -> Self {
        match value {
            Brand::Visa => Self::Visa,
            Brand::Master => Self::Master,
            Brand::Amex => Self::Amex,
            Brand::Elo => Self::Elo,
            Brand::Aura => Self::Aura,
            Brand::Jcb => Self::Jcb,
            Brand::Diners => Self::Diners,
            Brand::Discover => Self::Discover,
            Brand::Hipercard => Self::Hipercard,
            Brand::Hiper => Self::Hiper,
        }
    }
}

fn print(value: impl serde::Serialize) -> anyhow::Result<()> {
    let masked = mask::secure_serializable(value);
    println!("{}", serde_json::to_string_pretty(&masked)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("failed to load gateway configuration")?;
    tracing::info!(environment = ?config.environment, merchant = ?config.merchant, "Using gateway");
    let gateway = CieloGateway::new(config);

    match cli.command {
        Command::Create(args) => {
            let expiration = ExpirationDate::try_from(args.expiration)
                .map_err(anyhow::Error::msg)
                .context("invalid --expiration")?;
            let card = CreditCard::new(
                args.card,
                args.holder,
                expiration,
                args.security_code,
                args.brand.into(),
            );
            let mut payment = Payment::new(args.amount, card)
                .with_currency(Currency::Brl)
                .with_installments(args.installments)
                .with_capture(args.capture);
            if let Some(soft_descriptor) = args.soft_descriptor {
                payment = payment.with_soft_descriptor(soft_descriptor);
            }
            let order_id = args
                .order_id
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
            let transaction = Transaction::new(order_id, Customer::new(args.customer), payment);
            let request_id = args.request_id.unwrap_or_else(Uuid::new_v4);
            tracing::info!(%request_id, "Creating transaction");
            let created = gateway
                .create_transaction_with_retry(
                    &RetryPolicy::with_max_attempts(args.attempts),
                    request_id,
                    &transaction,
                )
                .await?;
            print(&created)
        }
        Command::Capture(args) => {
            let request_id = args.request_id.unwrap_or_else(Uuid::new_v4);
            let update = gateway
                .capture_transaction(request_id, args.payment_id, args.amount)
                .await?;
            print(&update)
        }
        Command::Void(args) => {
            let request_id = args.request_id.unwrap_or_else(Uuid::new_v4);
            let update = gateway
                .void_transaction(request_id, args.payment_id, args.amount)
                .await?;
            print(&update)
        }
        Command::Get { payment_id } => {
            let transaction = gateway.get_transaction(payment_id).await?;
            print(&transaction)
        }
    }
}

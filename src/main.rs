use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sell_flow::application::sell_flow::SellFlow;
use sell_flow::config::SellFlowConfig;
use sell_flow::domain::bank_account::BankAccount;
use sell_flow::domain::currency::Asset;
use sell_flow::domain::ports::{BankAccountServiceHandle, SellServices};
use sell_flow::infrastructure::in_memory::{CurrencyCatalog, InMemoryBankAccountStore, InMemoryWallet};
use sell_flow::infrastructure::tariff::{KycLimitPolicy, TariffQuoteService};
use sell_flow::interfaces::csv::bank_account_reader::BankAccountReader;
use sell_flow::interfaces::report::ReportWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration (currencies, tariffs, wallet, KYC limit)
    #[arg(long)]
    config: PathBuf,

    /// Bank accounts CSV file
    #[arg(long)]
    accounts: PathBuf,

    /// Id of the bank account to pay out to
    #[arg(long)]
    bank_account: u64,

    /// Asset to sell, e.g. BTC
    #[arg(long)]
    asset: String,

    /// Payout currency. Defaults to the account's preferred currency.
    #[arg(long)]
    currency: Option<String>,

    /// Amount of the asset to sell
    #[arg(long)]
    amount: String,

    /// Submit the payment once a quote is available
    #[arg(long)]
    submit: bool,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
async fn bank_account_store(
    db_path: Option<PathBuf>,
    accounts: Vec<BankAccount>,
) -> Result<BankAccountServiceHandle> {
    use sell_flow::infrastructure::rocksdb::RocksDbBankAccountStore;

    match db_path {
        Some(path) => {
            let store = RocksDbBankAccountStore::open(path).into_diagnostic()?;
            store.seed(accounts).await.into_diagnostic()?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryBankAccountStore::with_accounts(accounts))),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
async fn bank_account_store(
    db_path: Option<PathBuf>,
    accounts: Vec<BankAccount>,
) -> Result<BankAccountServiceHandle> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryBankAccountStore::with_accounts(accounts)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SellFlowConfig::from_reader(File::open(&cli.config).into_diagnostic()?)
        .into_diagnostic()?;

    let mut accounts = Vec::new();
    let reader = BankAccountReader::new(File::open(&cli.accounts).into_diagnostic()?);
    for account in reader.bank_accounts() {
        match account {
            Ok(account) => accounts.push(account),
            Err(e) => warn!(error = %e, "skipping bank account row"),
        }
    }

    let services = SellServices {
        bank_accounts: bank_account_store(cli.db_path, accounts).await?,
        currencies: Arc::new(CurrencyCatalog::new(config.currencies.clone())),
        quotes: Arc::new(
            TariffQuoteService::new(config.tariffs.clone())
                .with_ident_incomplete(config.ident_incomplete_ibans.clone()),
        ),
        kyc: Arc::new(KycLimitPolicy::new(config.kyc_limit)),
        wallet: Arc::new(InMemoryWallet::new(config.wallet_address.clone())),
    };

    let flow = SellFlow::new(services, config.flow_settings());
    flow.load().await.into_diagnostic()?;

    flow.change_asset(Asset::new(cli.asset)).await;
    flow.select_bank_account(cli.bank_account)
        .await
        .into_diagnostic()?;
    if let Some(code) = &cli.currency {
        flow.select_currency(code).await.into_diagnostic()?;
    }
    flow.set_amount(cli.amount).await;
    flow.refresh_now().await;

    let outcome = if cli.submit {
        Some(flow.submit().await)
    } else {
        None
    };

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_view(&flow.view().await).into_diagnostic()?;
    if let Some(outcome) = outcome {
        writer.write_outcome(&outcome).into_diagnostic()?;
    }

    Ok(())
}

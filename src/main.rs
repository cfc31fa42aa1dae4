use anyhow::Context;
use api_client::{
    ApiClient, ApiError, AuthApi, CreatePortfolioRequest, CreateProductRequest,
    CreateStrategyRequest, Credentials, FileTokenStore, GenerateReportRequest, RegisterRequest,
    TokenStore, UpdateStrategyRequest,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{BacktestRequest, OrderRequest, OrderSide, OrderType, ReportKind};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use session::SessionManager;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

mod output;

/// The main entry point for the QuantDesk command-line client.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if one exists
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install tracing subscriber");

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        print_expiry_notice(&err);
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = configuration::load_config().context("loading config.toml")?;

    // One token store, one client, one session manager for the whole run.
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.auth.token_file.clone()));
    let client = Arc::new(ApiClient::new(&config.api, tokens));
    let session = Arc::new(SessionManager::new(client.clone() as Arc<dyn AuthApi>));
    let _expiry_watch = session.watch_expiry();

    match cli.command {
        Commands::Login(args) => handle_login(args, &session).await,
        Commands::Logout => handle_logout(&session).await,
        Commands::Register(args) => handle_register(args, &session).await,
        Commands::Whoami => handle_whoami(&session, cli.json).await,
        Commands::Portfolio(command) => handle_portfolio(command, &client, cli.json).await,
        Commands::Strategy(command) => handle_strategy(command, &client, cli.json).await,
        Commands::Backtest(command) => handle_backtest(command, &client, &config, cli.json).await,
        Commands::Product(command) => handle_product(command, &client, cli.json).await,
        Commands::Trade(command) => handle_trade(command, &client, cli.json).await,
        Commands::Market(command) => handle_market(command, &client, &config, cli.json).await,
        Commands::Report(command) => handle_report(command, &client, cli.json).await,
    }
}

/// Points the user at `login` when a command died because the session could
/// not be silently refreshed.
fn print_expiry_notice(err: &anyhow::Error) {
    for cause in err.chain() {
        if let Some(ApiError::SessionExpired(reason)) = cause.downcast_ref::<ApiError>() {
            eprintln!("Session expired ({reason}). Run `quantdesk login` to start a new session.");
            return;
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A command-line client for the QuantDesk quantitative-finance platform.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print raw JSON instead of formatted tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session tokens.
    Login(LoginArgs),
    /// End the current session and clear stored tokens.
    Logout,
    /// Create a new account (does not log you in).
    Register(RegisterArgs),
    /// Show the currently authenticated user.
    Whoami,
    /// Inspect and manage portfolios.
    #[command(subcommand)]
    Portfolio(PortfolioCommands),
    /// Author strategies and evaluate their signals.
    #[command(subcommand)]
    Strategy(StrategyCommands),
    /// Submit and monitor backtests.
    #[command(subcommand)]
    Backtest(BacktestCommands),
    /// Build and manage structured products.
    #[command(subcommand)]
    Product(ProductCommands),
    /// Place orders and inspect positions.
    #[command(subcommand)]
    Trade(TradeCommands),
    /// Query market data.
    #[command(subcommand)]
    Market(MarketCommands),
    /// Generate, inspect, and download reports.
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Parser)]
struct LoginArgs {
    /// The account email address.
    #[arg(long)]
    email: String,

    /// The account password. Prompted on stdin when omitted.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Parser)]
struct RegisterArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: Option<String>,

    /// The display name shown to other platform users.
    #[arg(long)]
    name: String,
}

#[derive(Subcommand)]
enum PortfolioCommands {
    /// List all portfolios.
    List,
    /// Show one portfolio with its positions.
    Show { id: Uuid },
    /// Create an empty portfolio.
    Create {
        #[arg(long)]
        name: String,
        /// Base currency code (e.g. "USD").
        #[arg(long)]
        currency: String,
    },
    /// Delete a portfolio.
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum StrategyCommands {
    /// List all strategies.
    List,
    /// Show one strategy, including its definition source.
    Show { id: Uuid },
    /// Create a strategy from a definition file.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Path of the strategy definition source.
        #[arg(long)]
        file: PathBuf,
    },
    /// Upload a new version of the strategy definition.
    Update {
        id: Uuid,
        #[arg(long)]
        file: PathBuf,
        /// Label for this version in the history.
        #[arg(long)]
        comment: Option<String>,
    },
    /// List the version history of a strategy.
    Versions { id: Uuid },
    /// Evaluate the strategy's current signals for the given symbols.
    Evaluate {
        id: Uuid,
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Subcommand)]
enum BacktestCommands {
    /// List submitted backtests.
    List,
    /// Show one backtest, including metrics once completed.
    Show { id: Uuid },
    /// Submit a new backtest run.
    Run(RunBacktestArgs),
    /// Poll a running backtest until it finishes.
    Watch { id: Uuid },
    /// Cancel a queued or running backtest.
    Cancel { id: Uuid },
}

#[derive(Parser)]
struct RunBacktestArgs {
    /// The strategy to test.
    #[arg(long)]
    strategy: Uuid,

    /// The symbol to test on (e.g. "BTCUSDT").
    #[arg(long)]
    symbol: String,

    /// The candle interval (e.g. "1h", "4h", "1d").
    #[arg(long)]
    interval: String,

    /// The start date of the simulated period (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// The end date of the simulated period (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// The initial capital for the simulation.
    #[arg(long)]
    capital: Decimal,

    /// Keep polling until the run finishes.
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List all structured products.
    List,
    /// Show one product.
    Show { id: Uuid },
    /// Draft a new structured product.
    Create(CreateProductArgs),
    /// Issue a drafted product.
    Issue { id: Uuid },
    /// Request a fresh model price for a product.
    Reprice { id: Uuid },
    /// List the version history of a product's terms.
    Versions { id: Uuid },
}

#[derive(Parser)]
struct CreateProductArgs {
    #[arg(long)]
    name: String,

    /// Product family (e.g. "autocallable", "reverse-convertible").
    #[arg(long = "type")]
    product_type: String,

    /// Underlying symbol; repeat for baskets.
    #[arg(long = "underlying", required = true)]
    underlyings: Vec<String>,

    #[arg(long)]
    notional: Decimal,

    #[arg(long)]
    strike: Option<Decimal>,

    #[arg(long)]
    barrier: Option<Decimal>,

    /// Maturity date (format: YYYY-MM-DD).
    #[arg(long)]
    maturity: NaiveDate,
}

#[derive(Subcommand)]
enum TradeCommands {
    /// List orders.
    Orders,
    /// Place an order.
    Place(PlaceOrderArgs),
    /// Cancel an open order.
    Cancel { id: Uuid },
    /// List executed fills.
    History,
    /// List open positions.
    Positions,
    /// Fetch two-sided quotes for one or more symbols.
    Quote {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[derive(Parser)]
struct PlaceOrderArgs {
    #[arg(long)]
    symbol: String,

    /// "buy" or "sell".
    #[arg(long)]
    side: OrderSide,

    /// "market" or "limit".
    #[arg(long = "type", default_value = "market")]
    order_type: OrderType,

    #[arg(long)]
    quantity: Decimal,

    /// Required for limit orders.
    #[arg(long)]
    limit_price: Option<Decimal>,
}

#[derive(Subcommand)]
enum MarketCommands {
    /// Show the latest price for a symbol.
    Price {
        symbol: String,
        /// Keep fetching at the configured interval.
        #[arg(long)]
        watch: bool,
    },
    /// Show prices for a whole watchlist in one call.
    Batch {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Show recent OHLCV candles for a symbol.
    Ohlcv {
        symbol: String,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(long, default_value_t = 24)]
        limit: u32,
    },
    /// Search instruments by free text.
    Search { query: String },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// List generated reports.
    List,
    /// Request generation of a new report.
    Generate(GenerateReportArgs),
    /// Show aggregate analytics for a portfolio.
    Summary {
        #[arg(long)]
        portfolio: Uuid,
    },
    /// Download a report file.
    Download {
        id: Uuid,
        /// Where to write the file.
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Parser)]
struct GenerateReportArgs {
    /// "performance", "risk", or "trade-activity".
    #[arg(long)]
    kind: ReportKind,

    #[arg(long)]
    portfolio: Uuid,

    /// Period start (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Period end (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,
}

// ==============================================================================
// Session Commands
// ==============================================================================

async fn handle_login(args: LoginArgs, session: &SessionManager) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let user = session
        .login(&Credentials {
            email: args.email,
            password,
        })
        .await?;
    println!("Logged in as {} ({:?})", user.display_name, user.role);
    Ok(())
}

async fn handle_logout(session: &SessionManager) -> anyhow::Result<()> {
    session.logout().await;
    println!("Logged out.");
    Ok(())
}

async fn handle_register(args: RegisterArgs, session: &SessionManager) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let user = session
        .register(&RegisterRequest {
            email: args.email,
            password,
            display_name: args.name,
        })
        .await?;
    println!(
        "Account created for {}. Run `quantdesk login` to start a session.",
        user.email
    );
    Ok(())
}

async fn handle_whoami(session: &SessionManager, json: bool) -> anyhow::Result<()> {
    let snapshot = session.initialize().await;
    match snapshot.user {
        Some(user) if json => output::print_json(&user)?,
        Some(user) => {
            println!(
                "{} <{}> - {:?}, member since {}",
                user.display_name,
                user.email,
                user.role,
                user.created_at.date_naive()
            );
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    Ok(line.trim_end().to_string())
}

// ==============================================================================
// Portfolio Commands
// ==============================================================================

async fn handle_portfolio(
    command: PortfolioCommands,
    client: &ApiClient,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.portfolios();
    match command {
        PortfolioCommands::List => {
            let portfolios = api.list().await?;
            if json {
                return output::print_json(&portfolios);
            }
            let mut table = output::table(&["ID", "Name", "Currency", "Cash", "Total Value"]);
            for p in &portfolios {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.base_currency.clone(),
                    p.cash_balance.to_string(),
                    p.total_value.to_string(),
                ]);
            }
            println!("{table}");
        }
        PortfolioCommands::Show { id } => {
            let portfolio = api.get(id).await?;
            if json {
                return output::print_json(&portfolio);
            }
            println!(
                "{} ({}) - cash {}, total {}",
                portfolio.name,
                portfolio.base_currency,
                portfolio.cash_balance,
                portfolio.total_value
            );
            let mut table =
                output::table(&["Symbol", "Quantity", "Avg Entry", "Market Value", "Unreal. PnL"]);
            for position in &portfolio.positions {
                table.add_row(vec![
                    position.symbol.clone(),
                    position.quantity.to_string(),
                    position.avg_entry_price.to_string(),
                    position.market_value.to_string(),
                    position.unrealized_pnl.to_string(),
                ]);
            }
            println!("{table}");
        }
        PortfolioCommands::Create { name, currency } => {
            let portfolio = api
                .create(&CreatePortfolioRequest {
                    name,
                    base_currency: currency,
                })
                .await?;
            println!("Created portfolio {}", portfolio.id);
        }
        PortfolioCommands::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted portfolio {id}");
        }
    }
    Ok(())
}

// ==============================================================================
// Strategy Commands
// ==============================================================================

async fn handle_strategy(
    command: StrategyCommands,
    client: &ApiClient,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.strategies();
    match command {
        StrategyCommands::List => {
            let strategies = api.list().await?;
            if json {
                return output::print_json(&strategies);
            }
            let mut table = output::table(&["ID", "Name", "Version", "Updated"]);
            for s in &strategies {
                table.add_row(vec![
                    s.id.to_string(),
                    s.name.clone(),
                    s.version.to_string(),
                    s.updated_at.date_naive().to_string(),
                ]);
            }
            println!("{table}");
        }
        StrategyCommands::Show { id } => {
            let strategy = api.get(id).await?;
            if json {
                return output::print_json(&strategy);
            }
            println!(
                "{} v{} - {}\n\n{}",
                strategy.name, strategy.version, strategy.description, strategy.source
            );
        }
        StrategyCommands::Create {
            name,
            description,
            file,
        } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("reading strategy source {}", file.display()))?;
            let strategy = api
                .create(&CreateStrategyRequest {
                    name,
                    description,
                    source,
                })
                .await?;
            println!("Created strategy {} (v{})", strategy.id, strategy.version);
        }
        StrategyCommands::Update { id, file, comment } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("reading strategy source {}", file.display()))?;
            let strategy = api
                .update(id, &UpdateStrategyRequest { source, comment })
                .await?;
            println!("Updated strategy {} to v{}", strategy.id, strategy.version);
        }
        StrategyCommands::Versions { id } => {
            let versions = api.versions(id).await?;
            if json {
                return output::print_json(&versions);
            }
            let mut table = output::table(&["Version", "Created", "Comment"]);
            for v in &versions {
                table.add_row(vec![
                    v.version.to_string(),
                    v.created_at.date_naive().to_string(),
                    output::opt_cell(&v.comment),
                ]);
            }
            println!("{table}");
        }
        StrategyCommands::Evaluate { id, symbols } => {
            let evaluations = api.evaluate(id, &symbols).await?;
            if json {
                return output::print_json(&evaluations);
            }
            let mut table = output::table(&["Symbol", "Direction", "Strength", "As Of"]);
            for e in &evaluations {
                table.add_row(vec![
                    e.symbol.clone(),
                    format!("{:?}", e.direction),
                    e.strength.to_string(),
                    e.as_of.to_rfc3339(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

// ==============================================================================
// Backtest Commands
// ==============================================================================

async fn handle_backtest(
    command: BacktestCommands,
    client: &ApiClient,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.backtests();
    match command {
        BacktestCommands::List => {
            let backtests = api.list().await?;
            if json {
                return output::print_json(&backtests);
            }
            let mut table = output::table(&["ID", "Symbol", "Interval", "Status", "Progress"]);
            for b in &backtests {
                table.add_row(vec![
                    b.id.to_string(),
                    b.symbol.clone(),
                    b.interval.clone(),
                    b.status.to_string(),
                    format!("{}%", b.progress),
                ]);
            }
            println!("{table}");
        }
        BacktestCommands::Show { id } => {
            let backtest = api.get(id).await?;
            if json {
                return output::print_json(&backtest);
            }
            print_backtest(&backtest);
        }
        BacktestCommands::Run(args) => {
            let backtest = api
                .run(&BacktestRequest {
                    strategy_id: args.strategy,
                    symbol: args.symbol,
                    interval: args.interval,
                    start_date: args.from,
                    end_date: args.to,
                    initial_capital: args.capital,
                })
                .await?;
            println!("Submitted backtest {}", backtest.id);
            if args.watch {
                watch_backtest(client, config, backtest.id).await?;
            }
        }
        BacktestCommands::Watch { id } => {
            watch_backtest(client, config, id).await?;
        }
        BacktestCommands::Cancel { id } => {
            api.cancel(id).await?;
            println!("Cancelled backtest {id}");
        }
    }
    Ok(())
}

/// Polls the backtest at the configured fixed interval until it reaches a
/// terminal status. No backoff; the cadence is `polling.backtest_interval_secs`.
async fn watch_backtest(client: &ApiClient, config: &Config, id: Uuid) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));

    let interval = Duration::from_secs(config.polling.backtest_interval_secs);
    loop {
        let backtest = client.backtests().get(id).await?;
        spinner.set_message(format!("{} - {}%", backtest.status, backtest.progress));
        if backtest.status.is_terminal() {
            spinner.finish_with_message(format!("{}", backtest.status));
            print_backtest(&backtest);
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

fn print_backtest(backtest: &core_types::Backtest) {
    println!(
        "Backtest {} - {} {} [{} -> {}], capital {}: {}",
        backtest.id,
        backtest.symbol,
        backtest.interval,
        backtest.start_date,
        backtest.end_date,
        backtest.initial_capital,
        backtest.status
    );
    if let Some(metrics) = &backtest.metrics {
        println!(
            "  return {}%  drawdown {}%  sharpe {}  win rate {}%  trades {}",
            metrics.total_return_pct,
            metrics.max_drawdown_pct,
            metrics.sharpe_ratio,
            metrics.win_rate_pct,
            metrics.total_trades
        );
    }
}

// ==============================================================================
// Product Commands
// ==============================================================================

async fn handle_product(
    command: ProductCommands,
    client: &ApiClient,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.products();
    match command {
        ProductCommands::List => {
            let products = api.list().await?;
            if json {
                return output::print_json(&products);
            }
            let mut table =
                output::table(&["ID", "Name", "Type", "Status", "Notional", "Maturity", "Price"]);
            for p in &products {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.product_type.clone(),
                    format!("{:?}", p.status),
                    p.notional.to_string(),
                    p.maturity_date.to_string(),
                    output::opt_cell(&p.latest_price),
                ]);
            }
            println!("{table}");
        }
        ProductCommands::Show { id } => {
            let product = api.get(id).await?;
            if json {
                return output::print_json(&product);
            }
            println!(
                "{} ({}) on {} - {:?}, notional {}, strike {}, barrier {}, matures {}",
                product.name,
                product.product_type,
                product.underlyings.join(", "),
                product.status,
                product.notional,
                output::opt_cell(&product.strike),
                output::opt_cell(&product.barrier),
                product.maturity_date
            );
        }
        ProductCommands::Create(args) => {
            let product = api
                .create(&CreateProductRequest {
                    name: args.name,
                    product_type: args.product_type,
                    underlyings: args.underlyings,
                    notional: args.notional,
                    strike: args.strike,
                    barrier: args.barrier,
                    maturity_date: args.maturity,
                })
                .await?;
            println!("Drafted product {}", product.id);
        }
        ProductCommands::Issue { id } => {
            let product = api.issue(id).await?;
            println!(
                "Issued product {} on {}",
                product.id,
                output::opt_cell(&product.issue_date)
            );
        }
        ProductCommands::Reprice { id } => {
            let product = api.reprice(id).await?;
            println!(
                "Product {} repriced at {}",
                product.id,
                output::opt_cell(&product.latest_price)
            );
        }
        ProductCommands::Versions { id } => {
            let versions = api.versions(id).await?;
            if json {
                return output::print_json(&versions);
            }
            let mut table = output::table(&["Version", "Created", "Terms"]);
            for v in &versions {
                table.add_row(vec![
                    v.version.to_string(),
                    v.created_at.date_naive().to_string(),
                    v.terms.to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

// ==============================================================================
// Trade Commands
// ==============================================================================

async fn handle_trade(
    command: TradeCommands,
    client: &ApiClient,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.trades();
    match command {
        TradeCommands::Orders => {
            let orders = api.orders().await?;
            if json {
                return output::print_json(&orders);
            }
            let mut table =
                output::table(&["ID", "Symbol", "Side", "Type", "Qty", "Limit", "Status"]);
            for o in &orders {
                table.add_row(vec![
                    o.id.to_string(),
                    o.symbol.clone(),
                    format!("{:?}", o.side),
                    format!("{:?}", o.order_type),
                    o.quantity.to_string(),
                    output::opt_cell(&o.limit_price),
                    format!("{:?}", o.status),
                ]);
            }
            println!("{table}");
        }
        TradeCommands::Place(args) => {
            let order = api
                .place(&OrderRequest {
                    symbol: args.symbol,
                    side: args.side,
                    order_type: args.order_type,
                    quantity: args.quantity,
                    limit_price: args.limit_price,
                })
                .await?;
            println!("Placed order {} ({:?})", order.id, order.status);
        }
        TradeCommands::Cancel { id } => {
            api.cancel(id).await?;
            println!("Cancelled order {id}");
        }
        TradeCommands::History => {
            let trades = api.history().await?;
            if json {
                return output::print_json(&trades);
            }
            let mut table =
                output::table(&["ID", "Symbol", "Side", "Qty", "Price", "Fee", "Executed"]);
            for t in &trades {
                table.add_row(vec![
                    t.id.to_string(),
                    t.symbol.clone(),
                    format!("{:?}", t.side),
                    t.quantity.to_string(),
                    t.price.to_string(),
                    t.fee.to_string(),
                    t.executed_at.to_rfc3339(),
                ]);
            }
            println!("{table}");
        }
        TradeCommands::Positions => {
            let positions = api.positions().await?;
            if json {
                return output::print_json(&positions);
            }
            let mut table =
                output::table(&["Symbol", "Quantity", "Avg Entry", "Market Value", "Unreal. PnL"]);
            for p in &positions {
                table.add_row(vec![
                    p.symbol.clone(),
                    p.quantity.to_string(),
                    p.avg_entry_price.to_string(),
                    p.market_value.to_string(),
                    p.unrealized_pnl.to_string(),
                ]);
            }
            println!("{table}");
        }
        TradeCommands::Quote { symbols } => {
            // Fetch all requested quotes concurrently.
            let tasks: Vec<_> = symbols
                .iter()
                .map(|symbol| {
                    let api = client.trades();
                    async move { api.quote(symbol).await }
                })
                .collect();
            let results = join_all(tasks).await;

            let mut table = output::table(&["Symbol", "Bid", "Ask", "Last"]);
            for (symbol, result) in symbols.iter().zip(results) {
                match result {
                    Ok(quote) => {
                        table.add_row(vec![
                            quote.symbol.clone(),
                            quote.bid.to_string(),
                            quote.ask.to_string(),
                            quote.last.to_string(),
                        ]);
                    }
                    Err(err) => {
                        eprintln!("{symbol}: {err}");
                    }
                }
            }
            println!("{table}");
        }
    }
    Ok(())
}

// ==============================================================================
// Market Data Commands
// ==============================================================================

async fn handle_market(
    command: MarketCommands,
    client: &ApiClient,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.market_data();
    match command {
        MarketCommands::Price { symbol, watch } => {
            // Fixed-interval re-fetch; runs until interrupted.
            let interval = Duration::from_secs(config.polling.price_interval_secs);
            loop {
                let tick = api.price(&symbol).await?;
                if json {
                    output::print_json(&tick)?;
                } else {
                    println!(
                        "{}  {}  ({:+}%)  as of {}",
                        tick.symbol,
                        tick.price,
                        tick.change_pct,
                        tick.as_of.to_rfc3339()
                    );
                }
                if !watch {
                    return Ok(());
                }
                tokio::time::sleep(interval).await;
            }
        }
        MarketCommands::Batch { symbols } => {
            let ticks = api.prices(&symbols).await?;
            if json {
                return output::print_json(&ticks);
            }
            let mut table = output::table(&["Symbol", "Price", "Change %"]);
            for t in &ticks {
                table.add_row(vec![
                    t.symbol.clone(),
                    t.price.to_string(),
                    t.change_pct.to_string(),
                ]);
            }
            println!("{table}");
        }
        MarketCommands::Ohlcv {
            symbol,
            interval,
            limit,
        } => {
            let candles = api.ohlcv(&symbol, &interval, limit).await?;
            if json {
                return output::print_json(&candles);
            }
            let mut table = output::table(&["Open Time", "Open", "High", "Low", "Close", "Volume"]);
            for c in &candles {
                table.add_row(vec![
                    c.open_time.to_rfc3339(),
                    c.open.to_string(),
                    c.high.to_string(),
                    c.low.to_string(),
                    c.close.to_string(),
                    c.volume.to_string(),
                ]);
            }
            println!("{table}");
        }
        MarketCommands::Search { query } => {
            let hits = api.search(&query).await?;
            if json {
                return output::print_json(&hits);
            }
            let mut table = output::table(&["Symbol", "Name", "Exchange", "Class"]);
            for hit in &hits {
                table.add_row(vec![
                    hit.symbol.clone(),
                    hit.name.clone(),
                    hit.exchange.clone(),
                    hit.asset_class.clone(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

// ==============================================================================
// Report Commands
// ==============================================================================

async fn handle_report(
    command: ReportCommands,
    client: &ApiClient,
    json: bool,
) -> anyhow::Result<()> {
    let api = client.reports();
    match command {
        ReportCommands::List => {
            let reports = api.list().await?;
            if json {
                return output::print_json(&reports);
            }
            let mut table = output::table(&["ID", "Title", "Kind", "Period", "Generated"]);
            for r in &reports {
                table.add_row(vec![
                    r.id.to_string(),
                    r.title.clone(),
                    format!("{:?}", r.kind),
                    format!("{} -> {}", r.period_start, r.period_end),
                    r.generated_at.date_naive().to_string(),
                ]);
            }
            println!("{table}");
        }
        ReportCommands::Generate(args) => {
            let report = api
                .generate(&GenerateReportRequest {
                    kind: args.kind,
                    portfolio_id: args.portfolio,
                    period_start: args.from,
                    period_end: args.to,
                })
                .await?;
            println!("Generated report {} ({})", report.id, report.file_name);
        }
        ReportCommands::Summary { portfolio } => {
            let summary = api.summary(portfolio).await?;
            if json {
                return output::print_json(&summary);
            }
            println!(
                "Portfolio {} - return {}%, max drawdown {}%, volatility {}%",
                summary.portfolio_id,
                summary.total_return_pct,
                summary.max_drawdown_pct,
                summary.volatility_pct
            );
            let mut table = output::table(&["Date", "Value"]);
            for point in &summary.value_series {
                table.add_row(vec![point.date.to_string(), point.value.to_string()]);
            }
            println!("{table}");
        }
        ReportCommands::Download { id, output } => {
            let bytes = api.download(id).await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("writing report to {}", output.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
        }
    }
    Ok(())
}

//! Home Ownership CLI
//!
//! Command-line interface for loan schedules and buy-versus-rent comparisons

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use home_ownership::loan::MONTHS_PER_YEAR;
use home_ownership::{
    compare_ownership_to_renting, report, Breakeven, ComparisonReport, ModelConfig, SweepRunner,
};

#[derive(Parser, Debug)]
#[command(
    name = "home_ownership",
    version,
    about = "Loan amortization and buy-versus-rent breakeven"
)]
struct Cli {
    /// JSON configuration file (defaults to config/home_ownership.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    /// Write the monthly table to this CSV file
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Amortization schedule of the financed loan
    Schedule,
    /// Compare buying to renting and report the breakeven month
    Compare,
    /// Monthly payment for each loan duration in the sweep range
    SweepTerm,
    /// Breakeven month for each rent level in the sweep range
    SweepRent,
}

/// Per-field overrides of the configuration; rates are fractions (0.02 = 2%)
#[derive(Args, Debug)]
struct Overrides {
    #[arg(long, global = true)]
    price: Option<f64>,
    #[arg(long, global = true)]
    down_payment: Option<f64>,
    #[arg(long, global = true)]
    rent: Option<f64>,
    #[arg(long, global = true)]
    term: Option<u32>,
    #[arg(long, global = true)]
    rate: Option<f64>,
    #[arg(long, global = true)]
    insurance: Option<f64>,
    /// Do not model borrower insurance
    #[arg(long, global = true)]
    no_insurance: bool,
    #[arg(long, global = true)]
    notary_fee: Option<f64>,
    #[arg(long, global = true)]
    agency_fee: Option<f64>,
    #[arg(long, global = true)]
    property_tax: Option<f64>,
    /// Alternative investment rate (defaults to the loan rate when unset everywhere)
    #[arg(long, global = true)]
    alt_rate: Option<f64>,
    #[arg(long, global = true)]
    appreciation: Option<f64>,
}

impl Overrides {
    fn apply(&self, config: &mut ModelConfig) {
        let market = &mut config.market;
        let loan = &mut config.loan;

        if let Some(v) = self.price {
            market.home_price = v;
        }
        if let Some(v) = self.down_payment {
            market.down_payment = v;
        }
        if let Some(v) = self.rent {
            market.monthly_rent = v;
        }
        if let Some(v) = self.notary_fee {
            market.notary_fee_rate = v;
        }
        if let Some(v) = self.agency_fee {
            market.agency_fee_rate = v;
        }
        if let Some(v) = self.property_tax {
            market.annual_property_tax = v;
        }
        if let Some(v) = self.alt_rate {
            market.alternative_investment_rate = Some(v);
        }
        if let Some(v) = self.appreciation {
            market.annual_appreciation_rate = v;
        }

        if let Some(v) = self.term {
            loan.term_years = v;
        }
        if let Some(v) = self.rate {
            loan.annual_rate = v;
        }
        if let Some(v) = self.insurance {
            loan.insurance_rate = Some(v);
        }
        if self.no_insurance {
            loan.insurance_rate = None;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ModelConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ModelConfig::load_default().context("Failed to load default config")?,
    };
    cli.overrides.apply(&mut config);
    config.validate().context("Invalid parameters")?;

    match cli.command {
        Command::Schedule => run_schedule(&cli, &config),
        Command::Compare => run_compare(&cli, &config),
        Command::SweepTerm => run_sweep_term(&cli, &config),
        Command::SweepRent => run_sweep_rent(&cli, &config),
    }
}

fn create_csv(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn run_schedule(cli: &Cli, config: &ModelConfig) -> Result<()> {
    let principal = config.market.borrowed_amount(&config.loan);
    let schedule = config
        .loan
        .schedule(principal)
        .context("Down payment covers the whole cost; there is no loan to schedule")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&schedule.rows())?);
    } else {
        println!("Amortization Schedule");
        println!("=====================\n");
        println!("  Borrowed:        {:>12.2}", principal);
        println!("  Monthly payment: {:>12.2}", schedule.monthly_payment);
        println!("  Total interest:  {:>12.2}", schedule.total_interest_cost());
        println!("  Total repaid:    {:>12.2}", schedule.total_paid());
        println!();
        println!(
            "{:>5} {:>14} {:>12} {:>12} {:>12}",
            "Month", "Balance", "Payment", "Principal", "Interest"
        );
        println!("{}", "-".repeat(60));
        // Yearly rows keep the console table short
        let yearly = schedule
            .rows()
            .into_iter()
            .filter(|r| r.month % MONTHS_PER_YEAR as usize == 0);
        for row in yearly {
            println!(
                "{:>5} {:>14.2} {:>12.2} {:>12.2} {:>12.2}",
                row.month,
                row.outstanding_balance,
                row.payment,
                row.principal_paid,
                row.interest_paid
            );
        }
    }

    if let Some(path) = &cli.csv {
        report::write_schedule_csv(create_csv(path)?, &schedule)?;
        log::info!("Schedule written to {}", path.display());
    }
    Ok(())
}

fn run_compare(cli: &Cli, config: &ModelConfig) -> Result<()> {
    let result = compare_ownership_to_renting(&config.market, &config.loan)?;

    if cli.json {
        let runner = SweepRunner::new(config.market, config.loan);
        let (terms, rents) = runner.run(&config.sweep)?;
        let report =
            ComparisonReport::new(config.market, config.loan, &result).with_sweeps(terms, rents);
        println!("{}", report.to_json()?);
    } else {
        println!("Monthly payment: {:.0}", result.monthly_payment);
        println!("Total interest cost: {:.0}", result.total_interest_cost);
        match result.breakeven_month {
            Breakeven::Month(month) => println!(
                "Buying becomes more profitable than renting after {} months ({:.1} years).",
                month,
                month as f64 / MONTHS_PER_YEAR as f64
            ),
            Breakeven::Never => println!(
                "Buying does not become profitable within {} years.",
                result.horizon() / MONTHS_PER_YEAR as usize
            ),
        }
    }

    if let Some(path) = &cli.csv {
        report::write_comparison_csv(create_csv(path)?, &result)?;
        log::info!("Comparison written to {}", path.display());
    }
    Ok(())
}

fn run_sweep_term(cli: &Cli, config: &ModelConfig) -> Result<()> {
    config.sweep.validate()?;
    let runner = SweepRunner::new(config.market, config.loan);
    let rows = runner.payment_by_term(&config.sweep.terms())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:>6} {:>12}", "Years", "Payment");
        for row in &rows {
            println!("{:>6} {:>12.2}", row.term_years, row.monthly_payment);
        }
    }

    if let Some(path) = &cli.csv {
        report::write_term_sweep_csv(create_csv(path)?, &rows)?;
    }
    Ok(())
}

fn run_sweep_rent(cli: &Cli, config: &ModelConfig) -> Result<()> {
    config.sweep.validate()?;
    let runner = SweepRunner::new(config.market, config.loan);
    let rows = runner.breakeven_by_rent(&config.sweep.rents())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:>8} {:>12}", "Rent", "Breakeven");
        for row in &rows {
            println!("{:>8.0} {:>12}", row.monthly_rent, row.breakeven.to_string());
        }
    }

    if let Some(path) = &cli.csv {
        report::write_rent_sweep_csv(create_csv(path)?, &rows)?;
    }
    Ok(())
}

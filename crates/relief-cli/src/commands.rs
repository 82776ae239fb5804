//! Relief CLI subcommands
//!
//! Each command loads the platform configuration (file, then environment
//! overrides), builds a [`ReliefCoordinator`] and renders its result as a
//! table or as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::{info, warn};

use relief_core::api::{create_router, AllocateResourcesRequest, AppState, FullAnalysisRequestDto};
use relief_core::{
    AllocationReport, AllocationStatus, ImpactRequest, ImpactResult, Incident, PlatformConfig,
    ReferenceData, ReliefCoordinator, ResourceEstimate, TrackedResource, WeatherObservation,
};

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Weather readings shared by the prediction commands
#[derive(Args, Debug, Clone, Copy)]
pub struct WeatherArgs {
    /// Rainfall (mm)
    #[arg(long)]
    pub rainfall: f64,

    /// Wind speed (km/h)
    #[arg(long)]
    pub wind_speed: f64,

    /// Relative humidity (%)
    #[arg(long)]
    pub humidity: f64,

    /// Air temperature (°C)
    #[arg(long)]
    pub temperature: f64,
}

impl From<WeatherArgs> for WeatherObservation {
    fn from(w: WeatherArgs) -> Self {
        WeatherObservation::new(w.temperature, w.rainfall, w.humidity, w.wind_speed)
    }
}

/// Arguments for the predict command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Place name (district or city)
    #[arg(short, long)]
    pub location: String,

    /// Disaster category key, e.g. flash_flood
    #[arg(short, long)]
    pub disaster_type: String,

    /// Affected area override (0-100); the category default when omitted
    #[arg(short, long)]
    pub area: Option<f64>,

    /// Current weather
    #[command(flatten)]
    pub weather: WeatherArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the estimate command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Affected population
    #[arg(short, long)]
    pub population: u64,

    /// Disaster category key
    #[arg(short, long)]
    pub disaster_type: String,

    /// Response duration in days; the configured default when omitted
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the allocate command
#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// JSON file with `available_resources` and `disasters`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON file with `disaster_info`, `weather_data` and optional `available_resources`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the regions command
#[derive(Args, Debug)]
pub struct RegionsArgs {
    /// Resolve this place name instead of listing every region
    #[arg(short, long)]
    pub resolve: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind host (overrides config and ML_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config and ML_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

// ============================================================================
// Display Structs for Tables
// ============================================================================

#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl FieldRow {
    fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct RequirementRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Multiplier")]
    multiplier: String,
    #[tabled(rename = "Details")]
    details: String,
}

#[derive(Tabled, Serialize)]
struct AllocationRow {
    #[tabled(rename = "Incident")]
    incident: String,
    #[tabled(rename = "Type")]
    disaster_type: String,
    #[tabled(rename = "Priority")]
    priority: u64,
    #[tabled(rename = "Food")]
    food: String,
    #[tabled(rename = "Rescue")]
    rescue: String,
    #[tabled(rename = "Medical")]
    medical: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled, Serialize)]
struct UsageRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Available")]
    available: u64,
    #[tabled(rename = "Requested")]
    requested: u64,
    #[tabled(rename = "Allocated")]
    allocated: u64,
    #[tabled(rename = "Remaining")]
    remaining: u64,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

#[derive(Tabled, Serialize)]
struct RegionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Population")]
    population: u64,
    #[tabled(rename = "Aliases")]
    aliases: String,
}

// ============================================================================
// Command Execution
// ============================================================================

/// Platform configuration from `path` (or defaults) with environment overrides
pub fn load_platform(path: Option<&Path>) -> Result<PlatformConfig> {
    let config = match path {
        Some(path) => PlatformConfig::from_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlatformConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn load_coordinator(path: Option<&Path>) -> Result<ReliefCoordinator> {
    let platform = load_platform(path)?;
    Ok(ReliefCoordinator::from_platform_config(&platform)?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Execute the predict command
pub fn execute_predict(config: Option<&Path>, args: PredictArgs) -> Result<()> {
    let coordinator = load_coordinator(config)?;
    let mut request = ImpactRequest::new(args.location, args.disaster_type, args.weather.into());
    request.affected_area_percent = args.area;

    let result = coordinator.predict_impact(&request)?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_impact(&result),
    }
    Ok(())
}

/// Execute the estimate command
pub fn execute_estimate(config: Option<&Path>, args: EstimateArgs) -> Result<()> {
    let coordinator = load_coordinator(config)?;
    let estimate = coordinator.estimate_resources(args.population, &args.disaster_type, args.days)?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimate)?),
        OutputFormat::Table => print_estimate(&estimate),
    }
    Ok(())
}

/// Validated pool and incidents from an allocation request file
pub fn allocation_inputs(request: &AllocateResourcesRequest) -> Result<(relief_core::AllocationPool, Vec<Incident>)> {
    if request.disasters.is_empty() {
        bail!("disasters must be a non-empty list");
    }
    let pool = request.available_resources.to_pool()?;
    let incidents = request
        .disasters
        .iter()
        .enumerate()
        .map(|(i, d)| d.to_incident(i))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((pool, incidents))
}

/// Execute the allocate command
pub fn execute_allocate(config: Option<&Path>, args: AllocateArgs) -> Result<()> {
    let request: AllocateResourcesRequest = read_json(&args.input)?;
    let (pool, incidents) = allocation_inputs(&request)?;
    let coordinator = load_coordinator(config)?;

    let report = coordinator.allocate(&pool, &incidents);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_allocation(&report),
    }
    Ok(())
}

/// Execute the analyze command
pub fn execute_analyze(config: Option<&Path>, args: AnalyzeArgs) -> Result<()> {
    let dto: FullAnalysisRequestDto = read_json(&args.input)?;
    let request = dto.to_request()?;
    let coordinator = load_coordinator(config)?;

    let analysis = coordinator.full_analysis(&request)?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Table => {
            print_impact(&analysis.impact);
            println!();
            print_estimate(&analysis.resources);
            if let Some(report) = &analysis.allocation {
                println!();
                print_allocation(report);
            }
        }
    }
    Ok(())
}

/// Execute the regions command
pub fn execute_regions(config: Option<&Path>, args: RegionsArgs) -> Result<()> {
    let coordinator = load_coordinator(config)?;

    if let Some(input) = args.resolve {
        let region = coordinator.resolve_location(&input)?;
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(region)?),
            OutputFormat::Table => println!(
                "{} {} -> {} (population {})",
                "[OK]".green().bold(),
                input,
                region.name().bold(),
                region.population()
            ),
        }
        return Ok(());
    }

    let rows = region_rows(coordinator.reference());
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!("{}", "Regions".bold().cyan());
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }
    Ok(())
}

/// Execute the serve command
pub async fn execute_serve(config: Option<&Path>, args: ServeArgs) -> Result<()> {
    let mut platform = load_platform(config)?;
    if let Some(host) = args.host {
        platform.host = host;
    }
    if let Some(port) = args.port {
        platform.port = port;
    }
    platform.validate()?;

    let coordinator = ReliefCoordinator::from_platform_config(&platform)?;
    if !coordinator.has_model() {
        warn!("Serving without a population model; prediction endpoints return 503");
    }
    let app = create_router(AppState::new(coordinator));

    let address = platform.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "Relief API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Relief API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn print_impact(result: &ImpactResult) {
    println!("{}", "Impact Prediction".bold().cyan());
    let rows = vec![
        FieldRow::new("Region", &result.region),
        FieldRow::new("Disaster type", &result.disaster_type),
        FieldRow::new("Region population", result.region_population),
        FieldRow::new("Affected area (%)", format!("{:.1}", result.affected_area_percent)),
        FieldRow::new("Base affected", result.base_affected),
        FieldRow::new("Predicted affected", result.predicted_affected),
        FieldRow::new("Weather factor", format!("{:.4}", result.weather_factors.weather_factor)),
        FieldRow::new("Confidence", result.confidence),
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn requirement_rows(estimate: &ResourceEstimate) -> Vec<RequirementRow> {
    estimate
        .requirements
        .iter()
        .map(|r| RequirementRow {
            category: r.category.title().to_string(),
            priority: r.priority.instruction().to_string(),
            multiplier: format!("{:.1}x", r.multiplier),
            details: r.details.join("\n"),
        })
        .collect()
}

fn print_estimate(estimate: &ResourceEstimate) {
    println!(
        "{} {} people, {}, {} days",
        "Resource Requirements:".bold().cyan(),
        estimate.affected_population,
        estimate.disaster_type,
        estimate.duration_days
    );
    println!("{}", Table::new(requirement_rows(estimate)).with(Style::rounded()));
    println!("{} {}", "Strategy:".bold(), estimate.summary.deployment_strategy_text);
    for note in &estimate.summary.coordination_notes {
        println!("  - {note}");
    }
}

fn format_share(report: &relief_core::IncidentAllocation, resource: TrackedResource) -> String {
    match report.allocation(resource) {
        Some(a) => format!("{}/{} ({:.1}%)", a.allocated, a.requested, a.coverage_percent),
        None => "-".to_string(),
    }
}

fn format_status(status: AllocationStatus) -> String {
    match status {
        AllocationStatus::FullyAllocated => status.to_string().green().to_string(),
        AllocationStatus::PartiallyAllocated => status.to_string().yellow().to_string(),
    }
}

fn allocation_rows(report: &AllocationReport) -> Vec<AllocationRow> {
    report
        .incidents
        .iter()
        .map(|inc| AllocationRow {
            incident: inc.name.clone(),
            disaster_type: inc.disaster_type.to_string(),
            priority: inc.priority_score,
            food: format_share(inc, TrackedResource::FoodPackets),
            rescue: format_share(inc, TrackedResource::RescueTeams),
            medical: format_share(inc, TrackedResource::MedicalStaff),
            status: format_status(inc.status),
        })
        .collect()
}

fn usage_rows(report: &AllocationReport) -> Vec<UsageRow> {
    report
        .resources
        .iter()
        .map(|u| UsageRow {
            resource: u.resource.to_string(),
            available: u.available,
            requested: u.requested,
            allocated: u.allocated,
            remaining: u.remaining,
            efficiency: format!("{:.1}%", u.efficiency_percent),
        })
        .collect()
}

fn print_allocation(report: &AllocationReport) {
    println!("{}", "Allocation".bold().cyan());
    if report.has_shortage() {
        println!("{} Requests exceed available stock; shared by priority", "[SHORTAGE]".red().bold());
    }
    println!("{}", Table::new(allocation_rows(report)).with(Style::rounded()));
    println!("{}", Table::new(usage_rows(report)).with(Style::rounded()));
}

fn region_rows(reference: &ReferenceData) -> Vec<RegionRow> {
    reference
        .regions
        .regions()
        .iter()
        .map(|r| RegionRow {
            region: r.name().to_string(),
            population: r.population(),
            aliases: r.aliases().iter().cloned().collect::<Vec<_>>().join(", "),
        })
        .collect()
}

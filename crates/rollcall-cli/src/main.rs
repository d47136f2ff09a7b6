use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rollcall_aws::{AwsServices, ProvisionOutcome};
use rollcall_core::report::check_password;
use rollcall_core::{DailyReport, PipelineOutcome, Settings};
use rollcall_hw::Camera;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rollcall", about = "Face-recognition attendance: admin and maintenance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a day's attendance and optionally export it as CSV
    Admin {
        /// Admin password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Report date, YYYY-MM-DD (default: today, local time)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output format on stdout
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Also write attendance_<date>.csv into --out-dir
        #[arg(long)]
        export: bool,
        /// Directory for the CSV export
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Create the attendance table if it does not exist
    ProvisionTable {
        /// Table name (default: AttendanceTable)
        #[arg(long, env = "DYNAMO_TABLE_NAME")]
        table: Option<String>,
    },
    /// Upload an image, match it against known faces and mark attendance
    Identify {
        /// JPEG or PNG image containing one face
        image: PathBuf,
    },
    /// List V4L2 capture devices
    Devices,
    /// Capture one frame from the configured camera
    TestCamera {
        /// V4L2 device (default: /dev/video0)
        #[arg(long, env = "ROLLCALL_CAMERA_DEVICE")]
        device: Option<String>,
        /// Save the frame as JPEG
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Admin {
            password,
            date,
            format,
            export,
            out_dir,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Enter Admin Password: ")?,
            };
            check_password(&password, &settings.admin_password).context("admin login failed")?;

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let services = AwsServices::connect(&settings).await;
            let report = DailyReport::load(&services.dynamodb, &settings.table_name, date)
                .await
                .context("failed to load attendance")?;

            if report.is_empty() {
                println!("No attendance records found for {date}.");
                return Ok(());
            }

            let stdout = std::io::stdout();
            match format {
                Format::Table => print!("{}", report.render_table()),
                Format::Csv => report.write_csv(stdout.lock())?,
                Format::Json => {
                    report.write_json(stdout.lock())?;
                    println!();
                }
            }

            if export {
                let path = export_csv(&report, &out_dir)?;
                eprintln!("Exported {} records to {}", report.records.len(), path.display());
            }
        }
        Commands::ProvisionTable { table } => {
            let table = table.unwrap_or_else(|| settings.table_name.clone());
            let services = AwsServices::connect(&settings).await;
            match rollcall_aws::ensure_table(&services.dynamodb_client, &table).await? {
                ProvisionOutcome::AlreadyExists => println!("Table '{table}' already exists."),
                ProvisionOutcome::Created => println!("Table '{table}' created successfully."),
            }
        }
        Commands::Identify { image } => {
            let data = std::fs::read(&image)
                .with_context(|| format!("failed to read {}", image.display()))?;
            let filename = candidate_filename(&image);
            tracing::debug!(image = %image.display(), filename = %filename, "identifying");
            let services = AwsServices::connect(&settings).await;

            match services.pipeline(&settings).run(data, &filename).await {
                PipelineOutcome::Recognized {
                    name,
                    recorded: true,
                    ..
                } => println!("Attendance marked for {name}"),
                PipelineOutcome::Recognized {
                    name,
                    recorded: false,
                    ..
                } => bail!("recognized {name} but failed to write the attendance record"),
                PipelineOutcome::Unrecognized { key } => {
                    println!("Face not recognized (uploaded as {key})")
                }
                PipelineOutcome::NotUploaded => bail!("upload failed"),
            }
        }
        Commands::Devices => {
            let devices = Camera::list_devices();
            if devices.is_empty() {
                println!("No V4L2 capture devices found");
            }
            for d in devices {
                println!("{}  {} (driver {}, bus {})", d.path, d.name, d.driver, d.bus);
            }
        }
        Commands::TestCamera { device, save } => {
            let device = device.unwrap_or_else(|| settings.camera_device.clone());
            println!("Running camera diagnostics on {device}...");
            let camera = Camera::open(&device)?;
            let frame = camera.capture_frame()?;
            println!(
                "Captured frame #{}: {}x{} ({:?}), brightness {:.1}{}",
                frame.sequence,
                frame.width,
                frame.height,
                camera.fourcc,
                frame.avg_brightness(),
                if frame.is_dark() { " (dark)" } else { "" }
            );
            if let Some(path) = save {
                frame.save_jpeg(&path)?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    eprint!("{message}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn export_csv(report: &DailyReport, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(report.filename());
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    report.write_csv(std::io::BufWriter::new(file))?;
    Ok(path)
}

/// Unique object name for an uploaded image, keeping its extension.
fn candidate_filename(image: &Path) -> String {
    let ext = image
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string());
    format!("tmp{}.{ext}", uuid::Uuid::new_v4().simple())
}

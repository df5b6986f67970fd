use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use tracing::{info, warn};

use rental_storefront::config::ClientConfig;
use rental_storefront::dto::VehicleFilters;
use rental_storefront::models::Session;
use rental_storefront::services::{
    intent_from_selector, session_id_from_redirect, DateRangeSelector, ReconciliationStatus,
    SelectionOutcome, SelectionRejection, SessionOutcome,
};
use rental_storefront::{AppState, ClientError, ClientResult, Notice};

/// Cliente de línea de comandos de la tienda de alquiler
#[derive(Parser, Debug)]
#[command(name = "rental-storefront", version, about = "Vehicle rental storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Iniciar sesión y guardar el token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Crear una cuenta nueva
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Mostrar el usuario de la sesión guardada
    Whoami,
    /// Listar el catálogo
    Vehicles(FilterArgs),
    /// Días reservados de un vehículo
    Availability {
        vehicle_id: String,
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Reservar un vehículo y obtener la URL de pago
    Book {
        vehicle_id: String,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
    },
    /// Confirmar una reserva tras volver del pago
    Reconcile {
        #[arg(long, conflicts_with = "redirect_url")]
        session_id: Option<String>,
        #[arg(long)]
        redirect_url: Option<String>,
    },
    /// Mis reservas
    Bookings,
    Cancel {
        booking_id: String,
    },
    /// Descargar la factura de un pago
    Invoice {
        payment_id: String,
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
    Reviews {
        vehicle_id: String,
    },
    /// Enviar una reseña
    Review {
        vehicle_id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    keyword: Option<String>,
    #[arg(long = "type")]
    vehicle_type: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
}

impl From<FilterArgs> for VehicleFilters {
    fn from(args: FilterArgs) -> Self {
        VehicleFilters {
            keyword: args.keyword,
            vehicle_type: args.vehicle_type,
            location: args.location,
            min_price: args.min_price,
            max_price: args.max_price,
        }
    }
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    Dashboard,
    /// Todas las vistas del panel
    Overview,
    /// Aprobar o rechazar una reseña pendiente
    Moderate {
        review_id: String,
        #[arg(long)]
        reject: bool,
    },
}

/// Acepta RFC 3339 o una fecha `YYYY-MM-DD` (medianoche UTC)
fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    parse_day(value).map(|day| day.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", value, e))
}

fn print_notice(notice: &Notice) {
    println!("{}", notice);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = ClientConfig::from_env();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    let cli = Cli::parse();
    info!("🚗 Rental storefront ({}) contra {}", config.environment, config.api_base_url);

    let state = AppState::new(config)?;
    if let Err(e) = run(cli.command, &state).await {
        print_notice(&e.notice());
        return Err(e.into());
    }
    Ok(())
}

async fn run(command: Command, state: &AppState) -> ClientResult<()> {
    match command {
        Command::Login { email, password } => {
            let session = state.auth().login(&email, &password).await?;
            print_notice(&Notice::success(
                "Login Successful",
                format!("Welcome back, {}!", session.user.name),
            ));
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let notice = state.auth().register(&name, &email, &password).await?;
            print_notice(&notice);
        }
        Command::Logout => {
            state.auth().logout().await?;
            print_notice(&Notice::info("Logged Out", "Your session has been closed."));
        }
        Command::Whoami => {
            let session = state.auth().require_session().await?;
            let session = state.auth().refresh_profile(&session).await?;
            println!(
                "{} <{}>{}",
                session.user.name,
                session.user.email.as_deref().unwrap_or("-"),
                if session.is_admin() { " [admin]" } else { "" }
            );
        }
        Command::Vehicles(args) => {
            let vehicles = state.catalog().list_vehicles(&args.into()).await?;
            if vehicles.is_empty() {
                println!("No vehicles found.");
            }
            for vehicle in vehicles {
                println!(
                    "{}  {}  {}  ₹{}/day{}",
                    vehicle.id,
                    vehicle.display_name(),
                    vehicle.location.as_deref().unwrap_or("-"),
                    vehicle.price_per_day,
                    if vehicle.available { "" } else { "  (unavailable)" }
                );
            }
        }
        Command::Availability {
            vehicle_id,
            from,
            days,
        } => {
            let (vehicle, availability) =
                state.catalog().vehicle_with_availability(&vehicle_id).await?;
            let from = from.unwrap_or_else(|| Utc::now().date_naive());
            let to = from + chrono::Duration::days(i64::from(days));
            let blocked = availability.unavailable_days(from, to);
            println!("{}: {} booked day(s) between {} and {}", vehicle.display_name(), blocked.len(), from, to);
            for day in blocked {
                println!("  {}", day);
            }
        }
        Command::Book {
            vehicle_id,
            start,
            end,
        } => book(state, &vehicle_id, start, end).await?,
        Command::Reconcile {
            session_id,
            redirect_url,
        } => {
            let session = state.auth().require_session().await?;
            let session_id =
                session_id.or_else(|| redirect_url.as_deref().and_then(session_id_from_redirect));
            let handle = state.reconciliation(session, session_id).start();
            let mut updates = handle.subscribe();
            while updates.changed().await.is_ok() {
                let status = updates.borrow_and_update().clone();
                if let ReconciliationStatus::Loading { attempt } = status {
                    info!("⏳ Buscando la reserva (intento {})", attempt);
                } else {
                    break;
                }
            }
            let status = handle.wait().await.unwrap_or(ReconciliationStatus::NotFound);
            print_notice(&status.notice());
        }
        Command::Bookings => {
            let session = state.auth().require_session().await?;
            let list = state.bookings().my_bookings(&session).await?;
            if list.is_empty() {
                println!("You have no bookings yet.");
            }
            for booking in list.entries() {
                println!(
                    "{}  {}  {} -> {}  {}  {}",
                    booking.id,
                    booking.vehicle_label(),
                    booking.start_date.date_naive(),
                    booking.end_date.date_naive(),
                    booking.status,
                    booking.payment_label().unwrap_or_else(|| "N/A".to_string())
                );
            }
        }
        Command::Cancel { booking_id } => {
            let session = state.auth().require_session().await?;
            let service = state.bookings();
            let mut list = service.my_bookings(&session).await?;
            let notice = service.cancel(&session, &mut list, &booking_id).await?;
            print_notice(&notice);
        }
        Command::Invoice { payment_id, output } => {
            let session = state.auth().require_session().await?;
            let invoice = state.bookings().download_invoice(&session, &payment_id).await?;
            let path = output.unwrap_or_else(|| invoice.filename.clone().into());
            tokio::fs::write(&path, &invoice.bytes).await?;
            print_notice(&Notice::success(
                "Invoice Downloaded",
                format!("Saved to {}", path.display()),
            ));
        }
        Command::Reviews { vehicle_id } => {
            for review in state.catalog().reviews(&vehicle_id).await? {
                println!(
                    "{}/5  {}  {}",
                    review.rating,
                    review.user.as_ref().map_or("Anonymous", |u| u.name()),
                    review.comment
                );
            }
        }
        Command::Review {
            vehicle_id,
            rating,
            comment,
        } => {
            let session = state.auth().current_session().await?;
            let notice = state
                .catalog()
                .submit_review(session.as_ref(), &vehicle_id, rating, &comment)
                .await?;
            print_notice(&notice);
        }
        Command::Admin(admin) => {
            let session = state.auth().require_session().await?;
            run_admin(admin, state, &session).await?;
        }
    }
    Ok(())
}

async fn book(
    state: &AppState,
    vehicle_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ClientResult<()> {
    let session = state.auth().current_session().await?;
    let (vehicle, mut availability) = state.catalog().vehicle_with_availability(vehicle_id).await?;

    let now = Utc::now();
    let mut selector = DateRangeSelector::new();
    for (label, outcome) in [
        ("start", selector.select_start(start, now, &availability)),
        ("end", selector.select_end(end, now, &availability)),
    ] {
        match outcome {
            SelectionOutcome::Accepted => {}
            SelectionOutcome::Rejected(SelectionRejection::Unavailable) => {
                return Err(ClientError::MissingInput(format!(
                    "The selected {} date is already booked.",
                    label
                )));
            }
            SelectionOutcome::Rejected(SelectionRejection::BeforeMinimum { minimum }) => {
                return Err(ClientError::MissingInput(format!(
                    "The {} date must be on or after {}.",
                    label, minimum
                )));
            }
        }
    }
    if selector.has_known_conflict(&availability) {
        warn!("⚠️ El rango solapa una reserva conocida, el backend decidirá");
    }

    let intent = intent_from_selector(&vehicle, &selector, session.as_ref())?;
    println!(
        "{}: {} day(s), estimated total ₹{}",
        vehicle.display_name(),
        intent.billable_days,
        intent.price_estimate
    );

    // La sesión ya fue validada por la intención
    let Some(session) = session else {
        return Err(ClientError::Unauthenticated("Please log in to book a vehicle.".to_string()));
    };

    let outcome = state
        .payments()
        .initiate(&intent, &session, &mut availability)
        .await;
    print_notice(&outcome.notice());
    match outcome {
        SessionOutcome::Redirect(target) => {
            println!("{}", target.url);
            if let Some(id) = target.session_id {
                println!("After paying, run: rental-storefront reconcile --session-id {}", id);
            }
        }
        SessionOutcome::Conflict { .. } => {
            let today = Utc::now().date_naive();
            let blocked = availability.unavailable_days(today, today + chrono::Duration::days(60));
            println!("Booked days: {:?}", blocked);
        }
        SessionOutcome::Failed { retryable, .. } => {
            if retryable {
                println!("You can retry the same booking.");
            }
        }
    }
    Ok(())
}

async fn run_admin(command: AdminCommand, state: &AppState, session: &Session) -> ClientResult<()> {
    let admin = state.admin();
    match command {
        AdminCommand::Dashboard => {
            let stats = admin.dashboard(session).await?;
            println!("Users: {}", stats.total_users);
            println!("Bookings: {}", stats.total_bookings);
            println!("Revenue: ₹{}", stats.total_revenue);
        }
        AdminCommand::Overview => {
            let overview = admin.overview(session).await?;
            println!(
                "Users: {}  Bookings: {}  Revenue: ₹{}",
                overview.stats.total_users, overview.stats.total_bookings, overview.stats.total_revenue
            );
            println!("Vehicles: {}", overview.vehicles.len());
            println!("Bookings listed: {}", overview.bookings.len());
            println!("Users listed: {}", overview.users.len());
            println!("Pending reviews: {}", overview.pending_reviews.len());
        }
        AdminCommand::Moderate { review_id, reject } => {
            let mut pending = admin.pending_reviews(session).await?;
            let notice = admin
                .moderate_review(session, &mut pending, &review_id, !reject)
                .await?;
            print_notice(&notice);
            println!("{} review(s) still pending", pending.len());
        }
    }
    Ok(())
}

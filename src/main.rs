use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use staybook::api::{BookingApi, HttpApi};
use staybook::config::AppConfig;
use staybook::models::{Booking, Property};
use staybook::payment::{CardDetails, StripeProcessor};
use staybook::session::{SessionContext, SessionStore};
use staybook::stay::CalendarMonth;
use staybook::views::{
    AuthView, AvailabilityView, BookOutcome, BookingDetailView, BookingListView, ListingView,
    Loaded, Navigate, SignupForm, SubmitOutcome, ViewScope,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "staybook", version, about = "Browse listings, book stays and pay for them")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// List properties, optionally filtered by title
    Properties {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one property with its availability calendar
    Property {
        id: String,
        /// Month to draw, as YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    /// Book a stay
    Book(BookArgs),
    /// List your bookings
    Bookings,
    /// Show one booking
    Booking { id: String },
    /// Pay for a booking by card
    Pay(PayArgs),
}

#[derive(Args)]
struct BookArgs {
    property_id: String,
    /// Check-in date, YYYY-MM-DD
    #[arg(long)]
    check_in: Option<String>,
    /// Check-out date, YYYY-MM-DD
    #[arg(long)]
    check_out: Option<String>,
    /// Month for --pick, as YYYY-MM
    #[arg(long)]
    month: Option<String>,
    /// Calendar days clicked in order, e.g. --pick 5,8
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["check_in", "check_out"])]
    pick: Vec<u32>,
    #[arg(long, default_value_t = 1)]
    guests: u32,
}

#[derive(Args)]
struct PayArgs {
    booking_id: String,
    #[arg(long)]
    card_number: String,
    #[arg(long)]
    exp_month: u32,
    #[arg(long)]
    exp_year: u32,
    #[arg(long)]
    cvc: String,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "staybook=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let api: Arc<dyn BookingApi> = Arc::new(HttpApi::new(&config.api_base_url, config.http_timeout)?);
    let session = SessionContext::restore(SessionStore::new(config.session_file.clone())).await?;
    let signed_in = session.is_signed_in().await;
    info!(api = %config.api_base_url, signed_in, "Starting");

    let scope = ViewScope::new();
    let interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.close();
        }
    });

    match scope.run(run(cli.command, &config, api, session)).await {
        Some(result) => result,
        None => {
            warn!("Interrupted, pending result discarded");
            Ok(())
        }
    }
}

async fn run(
    command: Command,
    config: &AppConfig,
    api: Arc<dyn BookingApi>,
    session: SessionContext,
) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let auth = AuthView::new(api, session);
            match auth.login(&email, &password).await {
                Ok((_, user)) => {
                    let name = user.map(|u| u.name).unwrap_or_else(|| email.clone());
                    println!("Welcome back, {name}!");
                }
                Err(message) => bail!(message),
            }
        }

        Command::Signup { name, email, password, confirm_password } => {
            let form = SignupForm { name, email, password, confirm_password };
            match AuthView::new(api, session).signup(&form).await {
                Ok(_) => println!("Account created. Sign in with `staybook login`."),
                Err(message) => bail!(message),
            }
        }

        Command::Logout => {
            AuthView::new(api, session).logout().await?;
            println!("Signed out.");
        }

        Command::Properties { search } => {
            let Some(listing) = settle(ListingView::load(api.as_ref()).await, "Properties")? else {
                return Ok(());
            };
            let found = listing.filter(search.as_deref().unwrap_or(""));
            if found.is_empty() {
                println!("No properties found.");
            }
            for (i, property) in found.iter().enumerate() {
                println!("{}. {} ({:.2}/night)", i + 1, property.title, property.price_per_night);
                println!("   {}", property.address);
                println!("   Up to {} guests", property.max_guests);
                println!("   ID: {}", property.id);
                println!();
            }
        }

        Command::Property { id, month } => {
            let loaded = AvailabilityView::load(api, session, &id).await;
            let Some(view) = settle(loaded, "Property")? else {
                return Ok(());
            };
            let view = match month {
                Some(raw) => view.with_month(parse_month(&raw)?),
                None => view,
            };
            print_property(view.property());
            println!();
            println!("{}", view.month().render(None, None));
        }

        Command::Book(args) => book(args, api, session).await?,

        Command::Bookings => {
            let Some(list) = settle(BookingListView::load(api.as_ref(), &session).await, "Bookings")?
            else {
                return Ok(());
            };
            if list.is_empty() {
                println!("You have no bookings yet.");
            }
            for booking in list.bookings() {
                print_booking(booking);
                println!();
            }
        }

        Command::Booking { id } => {
            let Some(view) = settle(BookingDetailView::load(api, session, &id).await, "Booking")? else {
                return Ok(());
            };
            print_booking(view.booking());
            if view.can_pay() {
                println!("   Pay with `staybook pay {}`", view.booking().id);
            }
        }

        Command::Pay(args) => pay(args, config, api, session).await?,
    }

    Ok(())
}

async fn book(args: BookArgs, api: Arc<dyn BookingApi>, session: SessionContext) -> anyhow::Result<()> {
    let loaded = AvailabilityView::load(api, session, &args.property_id).await;
    let Some(mut view) = settle(loaded, "Property")? else {
        return Ok(());
    };
    if let Some(raw) = &args.month {
        view = view.with_month(parse_month(raw)?);
    }

    let selected = if args.pick.is_empty() {
        let check_in = args.check_in.as_deref().map(|raw| view.set_check_in(raw));
        let check_out = args.check_out.as_deref().map(|raw| view.set_check_out(raw));
        check_in.into_iter().chain(check_out).collect::<Result<Vec<_>, _>>()
    } else {
        args.pick.iter().map(|day| view.pick_day(*day)).collect()
    };
    if let Err(err) = selected {
        bail!(err.to_string());
    }
    view.set_guests(args.guests);

    let (check_in, check_out) = (view.selection().check_in(), view.selection().check_out());
    if let (None, Some(date)) = (&args.month, check_in) {
        view = view.with_month(CalendarMonth::containing(date));
    }
    println!("{}", view.month().render(check_in, check_out));
    if let Some(quote) = view.quote() {
        println!(
            "{:.2} x {} nights = {:.2} for {} guests",
            quote.nightly_rate,
            quote.nights,
            quote.total,
            view.guests()
        );
    }

    match view.book().await {
        BookOutcome::Created { booking, next } => {
            println!("Booking created successfully");
            print_booking(&booking);
            if let Navigate::Payment { booking_id } = next {
                println!("   Pay with `staybook pay {booking_id}`");
            }
            Ok(())
        }
        BookOutcome::Rejected { message, next } => {
            if next == Some(Navigate::Login) {
                println!("Sign in with `staybook login` first.");
            }
            bail!(message)
        }
    }
}

async fn pay(
    args: PayArgs,
    config: &AppConfig,
    api: Arc<dyn BookingApi>,
    session: SessionContext,
) -> anyhow::Result<()> {
    let processor = StripeProcessor::new(&config.stripe.api_base, config.stripe_key()?, config.http_timeout)?;

    let loaded = BookingDetailView::load(api, session, &args.booking_id).await;
    let Some(mut view) = settle(loaded, "Booking")? else {
        return Ok(());
    };
    let mut modal = view.open_payment().await?;
    println!("Paying {:.2} for booking {}", modal.amount(), modal.booking_id());
    let billing = modal.billing();
    println!("   Billed to {} <{}>", billing.name, billing.email);

    let card = CardDetails {
        number: args.card_number,
        exp_month: args.exp_month,
        exp_year: args.exp_year,
        cvc: args.cvc,
    };
    match modal.submit(&processor, &card).await {
        SubmitOutcome::Succeeded(intent) => {
            if view.complete_payment(&intent).await {
                println!("Payment successful!");
            } else {
                println!("Payment went through but the booking could not be updated yet.");
            }
            print_booking(view.booking());
            Ok(())
        }
        SubmitOutcome::Declined(message) => bail!(message),
        SubmitOutcome::Incomplete(status) => bail!("Payment not completed ({status:?})"),
    }
}

/// Print the non-ready states; `None` means there is nothing more to do
fn settle<T>(loaded: Loaded<T>, what: &str) -> anyhow::Result<Option<T>> {
    match loaded {
        Loaded::Ready(view) => Ok(Some(view)),
        Loaded::NotFound => {
            println!("{what} not found.");
            Ok(None)
        }
        Loaded::Failed(message) => bail!(message),
        Loaded::Redirect(Navigate::Login) => {
            println!("Please sign in with `staybook login`.");
            Ok(None)
        }
        Loaded::Redirect(_) => Ok(None),
    }
}

fn parse_month(raw: &str) -> anyhow::Result<CalendarMonth> {
    CalendarMonth::parse(raw).with_context(|| format!("Invalid month {raw:?}, expected YYYY-MM"))
}

fn print_property(property: &Property) {
    println!("{}", property.title);
    println!("   {}", property.address);
    println!("   {:.2}/night, up to {} guests", property.price_per_night, property.max_guests);
    if !property.amenities.is_empty() {
        println!("   Amenities: {}", property.amenities.join(", "));
    }
    if let Some(url) = property.primary_image() {
        println!("   Image: {url}");
    }
    if !property.description.is_empty() {
        println!();
        println!("{}", property.description);
    }
}

fn print_booking(booking: &Booking) {
    println!(
        "{} ({} to {}, {} nights)",
        booking.property_title().unwrap_or("Property"),
        booking.check_in,
        booking.check_out,
        booking.nights()
    );
    println!("   Guests: {}", booking.guests);
    println!("   Total: {:.2}", booking.total_amount);
    println!("   Status: {}, payment {}", booking.status, booking.payment_status);
    println!("   ID: {}", booking.id);
}

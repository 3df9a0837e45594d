//! CLI for the Pointage workforce attendance service.
//!
//! Plays the role of the page layer: each subcommand mounts the matching
//! shell, calls the resource service, and renders the outcome. Session
//! state persists across invocations in a JSON file, so a 403 teardown in
//! one command leaves the next one logged out, like a browser tab would be.

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use pointage_client::attendance::AttendanceApi;
use pointage_client::auth::AuthApi;
use pointage_client::company::CompanyApi;
use pointage_client::employees::EmployeesApi;
use pointage_client::kiosk::KioskApi;
use pointage_client::schedules::SchedulesApi;
use pointage_client::self_service::SelfServiceApi;
use pointage_client::{FileStore, Gateway, Namespace, SessionBus};
use pointage_core::{
    ChangePasswordRequest, ChangeUserDetailsRequest, CompanyInfo, LoginRequest, ManagerSettings,
    NewEmployee, NewSchedule, PresenceStatus, RecurringKind, RegisterRequest,
};
use pointage_shell::{HardNavigator, KioskShell, KioskState, UserShell, UserState};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pointage", version, about = "Workforce attendance client")]
struct Cli {
    /// Base URL of the attendance API, e.g. http://localhost:8080/api
    #[arg(long, env = "POINTAGE_API_URL")]
    api_url: String,

    /// Where session credentials are persisted between invocations.
    #[arg(
        long,
        env = "POINTAGE_SESSION_FILE",
        default_value = ".pointage-session.json"
    )]
    session_file: PathBuf,

    /// Machine-readable output.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and report which dashboard the session lands on.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Register a manager account together with its company.
    Register(RegisterArgs),
    /// Clear the stored user session.
    Logout,
    /// Show the stored session, if any.
    Whoami,
    /// Manager: employee roster operations.
    #[command(subcommand)]
    Employees(EmployeesCmd),
    /// Manager: shift schedules.
    #[command(subcommand)]
    Schedule(ScheduleCmd),
    /// Manager: attendance records.
    #[command(subcommand)]
    Attendance(AttendanceCmd),
    /// Manager: dashboard stats.
    Dashboard,
    /// Manager: company profile and settings.
    #[command(subcommand)]
    Profile(ProfileCmd),
    /// Employee: own data.
    #[command(subcommand)]
    Me(MeCmd),
    /// Employee: face enrollment for kiosk check-in.
    #[command(subcommand)]
    Face(FaceCmd),
    /// Kiosk device flow.
    #[command(subcommand)]
    Kiosk(KioskCmd),
    /// Change the signed-in user's username/phone or password.
    #[command(subcommand)]
    Account(AccountCmd),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    company: String,
    #[arg(long)]
    sector: String,
}

#[derive(Subcommand, Debug)]
enum EmployeesCmd {
    List {
        /// Include schedules and attendance history per employee.
        #[arg(long, default_value_t = false)]
        detailed: bool,
    },
    Add(EmployeeArgs),
    Update {
        #[arg(long)]
        id: i32,
        #[command(flatten)]
        employee: EmployeeArgs,
    },
    Rm {
        #[arg(long)]
        id: i32,
    },
}

#[derive(Args, Debug)]
struct EmployeeArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    position: String,
}

#[derive(Subcommand, Debug)]
enum ScheduleCmd {
    /// One employee's schedule for a day.
    Show {
        #[arg(long)]
        employee_id: i32,
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
    /// Every employee's schedule for a day.
    ShowAll {
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
    /// Assign a schedule to one or more employees.
    Add {
        /// Employee ids, repeatable.
        #[arg(long = "employee-id", required = true)]
        employee_ids: Vec<i32>,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        checkin: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        checkout: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        break_start: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        break_end: Option<NaiveTime>,
        #[arg(long, default_value_t = false)]
        day_off: bool,
        /// none, daily or weekly.
        #[arg(long, default_value = "none")]
        recurring: String,
    },
}

#[derive(Subcommand, Debug)]
enum AttendanceCmd {
    /// One employee's record for a day.
    Show {
        #[arg(long)]
        employee_id: i32,
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
    /// All records for a day.
    List {
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
    /// Override an employee's status (present, absent, late, free).
    Set {
        #[arg(long)]
        employee_id: i32,
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
        #[arg(long)]
        status: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCmd {
    Show,
    UpdateCompany {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        sector: Option<String>,
    },
    UpdateSettings {
        #[arg(long)]
        absence_threshold: i32,
        #[arg(long)]
        late_threshold: i32,
    },
}

#[derive(Subcommand, Debug)]
enum MeCmd {
    Info,
    Dashboard,
    Schedule {
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
    Attendance {
        #[arg(long, default_value_t = today())]
        date: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
enum FaceCmd {
    /// Upload the face image the kiosk will match against.
    Enroll {
        #[arg(long)]
        employee_id: i32,
        /// Path to the face image.
        image: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum KioskCmd {
    /// Pair this device using the company setup code.
    Auth {
        #[arg(long)]
        code: String,
    },
    /// Fetch the check-in roster.
    Setup,
    /// Submit a face image to mark attendance.
    Mark {
        #[arg(long)]
        employee_id: i32,
        image: PathBuf,
    },
    /// Drop the device pairing.
    Unpair,
}

#[derive(Subcommand, Debug)]
enum AccountCmd {
    UpdateDetails {
        #[arg(long)]
        username: String,
        #[arg(long)]
        phone: String,
    },
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("invalid time {s:?}: {e}"))
}

/// Wiring shared by every command: one store, one navigator, one session
/// bus, and a gateway per token namespace.
struct App {
    navigator: Arc<HardNavigator>,
    user: Arc<Gateway>,
    kiosk: Arc<Gateway>,
    store: Arc<FileStore>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Arc::new(FileStore::new(&cli.session_file));
        let navigator = Arc::new(HardNavigator::new());
        let bus = SessionBus::new();

        let user = Arc::new(Gateway::new(
            &cli.api_url,
            Namespace::User,
            store.clone(),
            navigator.clone(),
            bus.clone(),
        )?);
        let kiosk = Arc::new(Gateway::new(
            &cli.api_url,
            Namespace::Kiosk,
            store.clone(),
            navigator.clone(),
            bus,
        )?);

        Ok(Self {
            navigator,
            user,
            kiosk,
            store,
        })
    }
}

fn emit<T: Serialize>(value: &T, json: bool, human: String) {
    if json {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("failed to encode output: {e}"),
        }
    } else {
        println!("{human}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::new(&cli)?;

    let result = run(&cli, &app).await;

    // A forced navigation means the session was torn down mid-command.
    if let Some(target) = app.navigator.current() {
        eprintln!("Session rejected; continue at {}", target.path());
    }

    result
}

async fn run(cli: &Cli, app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match &cli.command {
        Commands::Login { username, password } => {
            let auth = AuthApi::new(app.user.clone());
            let mut shell = UserShell::new(app.store.clone());
            let outcome = auth
                .login(&LoginRequest {
                    username: username.clone(),
                    password: password.clone(),
                })
                .await?;
            let target = shell.on_login(&outcome);
            let human = match shell.state() {
                UserState::FaceEnrollment => format!(
                    "Signed in as {} — face enrollment required, continue at {}",
                    outcome.role,
                    target.path()
                ),
                _ => format!("Signed in as {} — dashboard: {}", outcome.role, target.path()),
            };
            emit(&outcome, json, human);
        }
        Commands::Register(args) => {
            let auth = AuthApi::new(app.user.clone());
            let feedback = auth
                .register(&RegisterRequest {
                    manager_first_name: args.first_name.clone(),
                    manager_last_name: args.last_name.clone(),
                    manager_username: args.username.clone(),
                    manager_email: args.email.clone(),
                    manager_phone: args.phone.clone(),
                    manager_password: args.password.clone(),
                    company_name: args.company.clone(),
                    company_sector: args.sector.clone(),
                })
                .await?;
            emit(&feedback, json, feedback.message.clone());
        }
        Commands::Logout => {
            let mut shell = UserShell::new(app.store.clone());
            let target = shell.logout();
            println!("Logged out — {}", target.path());
        }
        Commands::Whoami => {
            use pointage_client::CredentialStore;
            match app.store.current_role() {
                Some(role) => println!("{role}"),
                None => println!("not signed in"),
            }
        }
        Commands::Employees(cmd) => {
            let api = EmployeesApi::new(app.user.clone());
            match cmd {
                EmployeesCmd::List { detailed: false } => {
                    let employees = api.list().await?;
                    let human = employees
                        .iter()
                        .map(|e| {
                            format!(
                                "{:>4}  {} {}  <{}>  {}",
                                e.id,
                                e.employee_first_name,
                                e.employee_last_name,
                                e.employee_email,
                                e.employee_position_title.as_deref().unwrap_or("-")
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    emit(&employees, json, human);
                }
                EmployeesCmd::List { detailed: true } => {
                    let employees = api.list_detailed().await?;
                    let human = employees
                        .iter()
                        .map(|e| {
                            format!(
                                "{:>4}  {} {}  ({} schedules, {} attendance records)",
                                e.employee_details.id,
                                e.employee_details.employee_first_name,
                                e.employee_details.employee_last_name,
                                e.employee_schedules.len(),
                                e.employee_attendances.len()
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    emit(&employees, json, human);
                }
                EmployeesCmd::Add(args) => {
                    let feedback = api.add(&new_employee(args)).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
                EmployeesCmd::Update { id, employee } => {
                    let feedback = api.update(*id, &new_employee(employee)).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
                EmployeesCmd::Rm { id } => {
                    let feedback = api.delete(*id).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
            }
        }
        Commands::Schedule(cmd) => {
            let api = SchedulesApi::new(app.user.clone());
            match cmd {
                ScheduleCmd::Show { employee_id, date } => {
                    match api.for_employee(*employee_id, *date).await? {
                        Some(schedule) => {
                            let human = render_schedule(&schedule);
                            emit(&schedule, json, human);
                        }
                        None => println!("no schedule for {date}"),
                    }
                }
                ScheduleCmd::ShowAll { date } => {
                    let schedules = api.for_all(*date).await?;
                    let human = schedules
                        .iter()
                        .map(render_schedule)
                        .collect::<Vec<_>>()
                        .join("\n");
                    emit(&schedules, json, human);
                }
                ScheduleCmd::Add {
                    employee_ids,
                    name,
                    date,
                    checkin,
                    checkout,
                    break_start,
                    break_end,
                    day_off,
                    recurring,
                } => {
                    let schedule = NewSchedule {
                        schedule_name: name.clone(),
                        date: *date,
                        checkin_time: *checkin,
                        checkout_time: *checkout,
                        break_start_time: *break_start,
                        break_end_time: *break_end,
                        is_day_off: *day_off,
                        recurring_type: recurring.parse::<RecurringKind>()?,
                    };
                    let feedback = api.add(employee_ids, &schedule).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
            }
        }
        Commands::Attendance(cmd) => {
            let api = AttendanceApi::new(app.user.clone());
            match cmd {
                AttendanceCmd::Show { employee_id, date } => {
                    match api.of_employee(*employee_id, *date).await? {
                        Some(record) => {
                            let human = render_attendance(&record);
                            emit(&record, json, human);
                        }
                        None => println!("no attendance recorded for {date}"),
                    }
                }
                AttendanceCmd::List { date } => {
                    let records = api.records(*date).await?;
                    let human = records
                        .iter()
                        .map(render_attendance)
                        .collect::<Vec<_>>()
                        .join("\n");
                    emit(&records, json, human);
                }
                AttendanceCmd::Set {
                    employee_id,
                    date,
                    status,
                } => {
                    let status = status.parse::<PresenceStatus>()?;
                    let record = api.update_status(*employee_id, *date, status).await?;
                    let human = render_attendance(&record);
                    emit(&record, json, human);
                }
            }
        }
        Commands::Dashboard => {
            let api = CompanyApi::new(app.user.clone());
            let stats = api.dashboard_stats().await?;
            let mut human = format!(
                "{} — {} employees, {} schedules, {} attendance records",
                stats.company_name,
                stats.total_employees,
                stats.total_schedules,
                stats.total_attendances
            );
            for day in &stats.week_presence_stats {
                human.push_str(&format!(
                    "\n  {:<10} present {:>3}  late {:>3}  absent {:>3}  free {:>3}",
                    day.day_name, day.total_present, day.total_late, day.total_absent,
                    day.total_free
                ));
            }
            emit(&stats, json, human);
        }
        Commands::Profile(cmd) => {
            let api = CompanyApi::new(app.user.clone());
            match cmd {
                ProfileCmd::Show => {
                    let profile = api.profile().await?;
                    let human = format!(
                        "{} ({})\nmanager: {} {} <{}>\ncamera code: {}\nthresholds: late {}m, absent {}m",
                        profile.company_info.name,
                        profile.company_info.sector.as_deref().unwrap_or("-"),
                        profile.manager_details.user_first_name,
                        profile.manager_details.user_last_name,
                        profile.manager_details.user_email,
                        profile.camera_code.as_deref().unwrap_or("-"),
                        profile.manager_settings.late_threshold_minutes,
                        profile.manager_settings.absence_threshold_minutes,
                    );
                    emit(&profile, json, human);
                }
                ProfileCmd::UpdateCompany {
                    name,
                    address,
                    website,
                    phone,
                    email,
                    sector,
                } => {
                    let info = CompanyInfo {
                        name: name.clone(),
                        address: address.clone(),
                        website: website.clone(),
                        phone: phone.clone(),
                        email: email.clone(),
                        sector: sector.clone(),
                    };
                    let feedback = api.update_company(&info).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
                ProfileCmd::UpdateSettings {
                    absence_threshold,
                    late_threshold,
                } => {
                    let settings = ManagerSettings {
                        absence_threshold_minutes: *absence_threshold,
                        late_threshold_minutes: *late_threshold,
                    };
                    let feedback = api.update_settings(&settings).await?;
                    emit(&feedback, json, feedback.message.clone());
                }
            }
        }
        Commands::Me(cmd) => {
            let api = SelfServiceApi::new(app.user.clone());
            match cmd {
                MeCmd::Info => {
                    let me = api.info().await?;
                    let human = format!(
                        "{} {} <{}> — {}",
                        me.employee_first_name,
                        me.employee_last_name,
                        me.employee_email,
                        me.employee_position_title.as_deref().unwrap_or("-")
                    );
                    emit(&me, json, human);
                }
                MeCmd::Dashboard => {
                    let dash = api.dashboard().await?;
                    let human = format!(
                        "{} {}\n  today's schedule: {}\n  today's attendance: {}",
                        dash.employee_first_name,
                        dash.employee_last_name,
                        dash.today_schedule
                            .as_ref()
                            .map(render_schedule)
                            .unwrap_or_else(|| "none".into()),
                        dash.today_attendance
                            .as_ref()
                            .map(render_attendance)
                            .unwrap_or_else(|| "none".into()),
                    );
                    emit(&dash, json, human);
                }
                MeCmd::Schedule { date } => match api.schedule(*date).await? {
                    Some(schedule) => {
                        let human = render_schedule(&schedule);
                        emit(&schedule, json, human);
                    }
                    None => println!("no schedule for {date}"),
                },
                MeCmd::Attendance { date } => match api.attendance(*date).await? {
                    Some(record) => {
                        let human = render_attendance(&record);
                        emit(&record, json, human);
                    }
                    None => println!("no attendance recorded for {date}"),
                },
            }
        }
        Commands::Face(FaceCmd::Enroll { employee_id, image }) => {
            let api = SelfServiceApi::new(app.user.clone());
            let bytes = std::fs::read(image)?;
            let file_name = image
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("face.jpg");
            let feedback = api.register_face(*employee_id, file_name, bytes).await?;
            emit(&feedback, json, feedback.message.clone());
        }
        Commands::Kiosk(cmd) => {
            let api = KioskApi::new(app.kiosk.clone());
            let mut shell = KioskShell::new(app.store.clone());
            match cmd {
                KioskCmd::Auth { code } => {
                    api.authenticate(code).await?;
                    let target = shell.on_paired();
                    println!("Kiosk paired — continue at {}", target.path());
                }
                KioskCmd::Setup => {
                    let setup = api.setup().await?;
                    let human = format!(
                        "{}: {} employee(s) expected",
                        setup.company_name,
                        setup.employees.len()
                    );
                    shell.on_setup(setup.clone());
                    emit(&setup, json, human);
                }
                KioskCmd::Mark { employee_id, image } => {
                    let bytes = std::fs::read(image)?;
                    let file_name = image
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("capture.jpg");
                    let result = api.verify_face(*employee_id, file_name, bytes).await;
                    shell.on_mark_result(&result);
                    if shell.state() == KioskState::Unconfigured {
                        eprintln!("Device session rejected; pair the kiosk again.");
                    }
                    let feedback = result?;
                    emit(&feedback, json, feedback.message.clone());
                }
                KioskCmd::Unpair => {
                    let target = shell.unpair();
                    println!("Kiosk unpaired — {}", target.path());
                }
            }
        }
        Commands::Account(cmd) => {
            let auth = AuthApi::new(app.user.clone());
            match cmd {
                AccountCmd::UpdateDetails { username, phone } => {
                    let outcome = auth
                        .change_user_details(&ChangeUserDetailsRequest {
                            new_username: username.clone(),
                            new_phone_number: phone.clone(),
                        })
                        .await?;
                    emit(&outcome, json, format!("Details updated; role {}", outcome.role));
                }
                AccountCmd::ChangePassword { old, new } => {
                    let feedback = auth
                        .change_password(&ChangePasswordRequest {
                            old_password: old.clone(),
                            new_password: new.clone(),
                        })
                        .await?;
                    emit(&feedback, json, feedback.message.clone());
                }
            }
        }
    }

    Ok(())
}

fn new_employee(args: &EmployeeArgs) -> NewEmployee {
    NewEmployee {
        employee_first_name: args.first_name.clone(),
        employee_last_name: args.last_name.clone(),
        employee_email: args.email.clone(),
        employee_phone: args.phone.clone(),
        employee_position_title: args.position.clone(),
    }
}

fn render_schedule(s: &pointage_core::Schedule) -> String {
    if s.is_day_off == Some(true) {
        return format!(
            "{}  {} {}  {}  day off",
            s.date, s.employee_first_name, s.employee_last_name, s.schedule_name
        );
    }
    format!(
        "{}  {} {}  {}  {} - {}",
        s.date,
        s.employee_first_name,
        s.employee_last_name,
        s.schedule_name,
        s.checkin_time.map(|t| t.to_string()).unwrap_or_else(|| "--".into()),
        s.checkout_time.map(|t| t.to_string()).unwrap_or_else(|| "--".into()),
    )
}

fn render_attendance(r: &pointage_core::AttendanceRecord) -> String {
    format!(
        "{}  {} {}  {}  in {}  out {}",
        r.date,
        r.employee_first_name,
        r.employee_last_name,
        r.status,
        r.checkin_time.map(|t| t.to_string()).unwrap_or_else(|| "--".into()),
        r.checkout_time.map(|t| t.to_string()).unwrap_or_else(|| "--".into()),
    )
}

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use timelog_core::notion::{
    daily_query_params, daily_report, format_page_title, page_create_params,
    page_to_clipboard_text, page_update_params, search_params,
};
use timelog_core::form::parse_minutes;
use timelog_core::storage::{Database, NotionProperties};
use timelog_core::{
    classify, credentials, Clock, Config, InputtingFlag, IntervalTracker, NotionClient,
    NotionError, Page, RecordForm, RecordStore, SubmitOutcome, SystemClock, UpdateForm,
    ValidationError,
};
use tracing::warn;

#[derive(Subcommand)]
pub enum RecordAction {
    /// Record a new activity
    Create(CreateArgs),
    /// Edit a recent record (the latest one by default)
    Update(UpdateArgs),
    /// List recent records, oldest first
    Recent {
        /// Print the raw pages as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the reflection report for one day
    Daily {
        /// Day as YYYY-MM-DD (default: today)
        date: Option<NaiveDate>,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// What you are doing
    title: Option<String>,
    /// Start offset from now in minutes, 0 or negative
    #[arg(long, allow_negative_numbers = true, value_parser = start_minutes)]
    start: Option<i64>,
    /// Length of the task in minutes
    #[arg(long, short, value_parser = length_minutes)]
    minutes: Option<i64>,
    /// Effectivity option (A, B or C)
    #[arg(long)]
    effectivity: Option<String>,
    /// Waste time category
    #[arg(long)]
    waste: Option<String>,
    /// Activity category; suggested from the title when omitted
    #[arg(long)]
    category: Option<String>,
    /// Success criteria for future tasks, reflection for past ones
    #[arg(long)]
    reflection: Option<String>,
    /// Tension option (high, normal or low)
    #[arg(long)]
    tension: Option<String>,
    /// Keep registering: print the slot that follows this record
    #[arg(long = "continue")]
    continue_register: bool,
    /// Record a break of this many minutes (usually 5 or 15)
    #[arg(long = "break", value_name = "MINUTES", value_parser = length_minutes)]
    break_minutes: Option<i64>,
    /// Fill the gap since the latest record ended
    #[arg(long)]
    since_last: bool,
    /// Reuse title and categories of the latest record
    #[arg(long)]
    copy_latest: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Page to update (default: the latest record)
    #[arg(long)]
    page_id: Option<String>,
    #[arg(long)]
    title: Option<String>,
    /// Start as YYYY-MM-DDTHH:MM
    #[arg(long)]
    start: Option<String>,
    /// End as YYYY-MM-DDTHH:MM
    #[arg(long, conflicts_with = "end_now")]
    end: Option<String>,
    /// Set the end to the current minute
    #[arg(long)]
    end_now: bool,
    #[arg(long)]
    effectivity: Option<String>,
    #[arg(long)]
    waste: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    reflection: Option<String>,
}

fn start_minutes(raw: &str) -> Result<i64, ValidationError> {
    parse_minutes("start", raw)
}

fn length_minutes(raw: &str) -> Result<i64, ValidationError> {
    parse_minutes("minutes", raw)
}

pub async fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = notion_client(&config)?;
    let props = &config.notion.properties;

    match action {
        RecordAction::Create(args) => {
            let db = Database::open()?;
            let flag = InputtingFlag::new(&db);
            flag.set()?;
            let result = create(args, &config, &client, &db).await;
            flag.remove()?;
            result?;
        }
        RecordAction::Update(args) => {
            let db = Database::open()?;
            let flag = InputtingFlag::new(&db);
            flag.set()?;
            let result = update(args, &config, &client).await;
            flag.remove()?;
            result?;
        }
        RecordAction::Recent { json } => {
            let mut pages = recent(&config, &client).await?;
            pages.reverse();
            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
                return Ok(());
            }
            for page in &pages {
                match format_page_title(page, props) {
                    Ok(line) => println!("{}  {line}", page.id),
                    Err(e) => warn!(error = %e, "skipping record"),
                }
            }
        }
        RecordAction::Daily { date } => {
            let now = SystemClock.now_local();
            let date = date.unwrap_or_else(|| now.date_naive());
            let offset = *now.offset();
            let pages = client
                .query_all(&daily_query_params(props, date, offset))
                .await?;
            let report = daily_report(&pages, props, date, offset)?;
            if report.is_empty() {
                eprintln!("no records on {date}");
            } else {
                println!("{report}");
            }
        }
    }
    Ok(())
}

fn notion_client(config: &Config) -> Result<NotionClient, Box<dyn std::error::Error>> {
    let database_id = config.database_id()?;
    let token = credentials::notion_token()?;
    Ok(NotionClient::new(&config.notion.base_url, token, database_id))
}

/// Recent records, newest first.
async fn recent(config: &Config, client: &NotionClient) -> Result<Vec<Page>, Box<dyn std::error::Error>> {
    let query = search_params(
        &config.notion.properties,
        config.form.recent_page_size,
        SystemClock.now_local(),
    );
    Ok(client.query_records(&query).await?.results)
}

async fn latest(config: &Config, client: &NotionClient) -> Result<Page, Box<dyn std::error::Error>> {
    let page = recent(config, client)
        .await?
        .into_iter()
        .next()
        .ok_or(NotionError::NoRecords)?;
    Ok(page)
}

fn latest_end(page: &Page, props: &NotionProperties) -> Result<chrono::DateTime<chrono::FixedOffset>, NotionError> {
    page.end_time(props)
        .or_else(|| page.start_time(props))
        .ok_or_else(|| NotionError::MissingProperty {
            page_id: page.id.clone(),
            property: props.time.clone(),
        })
}

async fn create(
    args: CreateArgs,
    config: &Config,
    client: &NotionClient,
    db: &Database,
) -> Result<(), Box<dyn std::error::Error>> {
    let props = &config.notion.properties;
    let clock = SystemClock;
    let now = clock.now_local();

    let mut form = RecordForm {
        minutes: i64::from(config.form.default_minutes),
        ..RecordForm::default()
    };
    if args.since_last || args.copy_latest {
        let page = latest(config, client).await?;
        if args.since_last {
            form.apply_since_last(latest_end(&page, props)?, now);
        }
        if args.copy_latest {
            form.copy_from(&page, props);
        }
    }
    if let Some(minutes) = args.break_minutes {
        form.apply_break(minutes);
    }

    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(start) = args.start {
        form.start_minutes = start;
    }
    if let Some(minutes) = args.minutes {
        form.minutes = minutes;
    }
    if let Some(effectivity) = args.effectivity {
        form.effectivity = effectivity;
    }
    if let Some(waste) = args.waste {
        form.waste_time_category = waste;
    }
    if let Some(category) = args.category {
        form.activity_category = category;
    }
    if let Some(reflection) = args.reflection {
        form.reflection = reflection;
    }
    if let Some(tension) = args.tension {
        form.tension = tension;
    }
    form.continue_register = args.continue_register;
    form.suggest_category(|title| classify(title).map(str::to_string));
    form.validate()?;

    let body = page_create_params(&form, props, client.database_id(), now);
    let page = client.create_record(&body).await?;
    println!("{}", format_page_title(&page, props)?);

    match form.after_submit() {
        SubmitOutcome::StartTimer(minutes) => {
            IntervalTracker::new(db, clock).create_interval(minutes)?;
            println!("timer started: {minutes} min");
        }
        SubmitOutcome::ContinueRegister(next) => {
            println!(
                "next: timelog record create --start {} --minutes {} --continue <TITLE>",
                next.start_minutes, next.minutes
            );
        }
        SubmitOutcome::Close => {}
    }
    Ok(())
}

async fn update(
    args: UpdateArgs,
    config: &Config,
    client: &NotionClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let props = &config.notion.properties;
    let now = SystemClock.now_local();

    let pages = recent(config, client).await?;
    let page = match &args.page_id {
        Some(id) => pages.iter().find(|p| &p.id == id),
        None => pages.first(),
    }
    .ok_or(NotionError::NoRecords)?;

    let mut form = UpdateForm::from_page(page, props);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(start) = args.start {
        form.start = start;
    }
    if let Some(end) = args.end {
        form.end = end;
    }
    if args.end_now {
        form.end_now(now);
    }
    if let Some(effectivity) = args.effectivity {
        form.effectivity = effectivity;
    }
    if let Some(waste) = args.waste {
        form.waste_time_category = waste;
    }
    if let Some(category) = args.category {
        form.activity_category = category;
    }
    if let Some(reflection) = args.reflection {
        form.reflection = reflection;
    }
    form.validate()?;

    let body = page_update_params(&form, props, *now.offset());
    let updated = client.update_record(&form.page_id, &body).await?;
    println!("{}", page_to_clipboard_text(&updated, props, now)?);
    Ok(())
}

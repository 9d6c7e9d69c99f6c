use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use timelog_core::classifier::taxonomy::activity_sections;
use timelog_core::classifier::DebounceOutcome;
use timelog_core::{ActivityClassifier, ClassificationDebouncer, Config};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Title to classify
    #[arg(required_unless_present_any = ["watch", "list"])]
    title: Option<String>,
    /// Treat each stdin line as an edit of the title and print the
    /// suggestion once typing pauses
    #[arg(long, conflicts_with = "title")]
    watch: bool,
    /// List the known categories by section
    #[arg(long, conflicts_with_all = ["title", "watch"])]
    list: bool,
}

pub async fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.list {
        for (section, categories) in activity_sections() {
            println!("## {}", section.as_str());
            for category in categories {
                println!("- {category}");
            }
        }
        return Ok(());
    }

    if args.watch {
        let config = Config::load()?;
        return watch(Duration::from_millis(config.form.classify_debounce_ms)).await;
    }

    let title = args.title.unwrap_or_default();
    let classifier = ActivityClassifier::default();
    let category = classifier
        .classify(&title)
        .ok_or_else(|| format!("no category matches '{title}'"))?;
    println!("{category}");
    Ok(())
}

async fn watch(quiet_period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut debouncer =
        ClassificationDebouncer::new(Arc::new(ActivityClassifier::default()), quiet_period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest = None;

    while let Some(title) = lines.next_line().await? {
        let pending = debouncer.title_changed(title.clone());
        // Earlier attempts were superseded or already printed; their tasks end on their own.
        latest = Some(tokio::spawn(async move {
            if let DebounceOutcome::Fired(category) = pending.outcome().await {
                println!("{title}\t{}", category.as_deref().unwrap_or("-"));
            }
        }));
    }

    // The last edit is still armed at end of input; let it fire.
    if let Some(printer) = latest {
        printer.await?;
    }
    Ok(())
}

//! Terminal browser for DaleelFM content.

use clap::Parser;
use clap::Subcommand;
use log::debug;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use daleel_lib::DaleelClient;
use daleel_lib::exam::ExamForm;
use daleel_lib::model::ContentArea;
use daleel_lib::model::FileKind;
use daleel_lib::navigator::ChildrenState;
use daleel_lib::navigator::TreeNavigator;
use daleel_lib::navigator::TreeNode;
use daleel_lib::navigator::TreeState;
use daleel_lib::selection::Selection;

#[derive(Parser)]
#[command(name = "daleel", about = "Browse DaleelFM content from the terminal")]
struct Cli {
    /// API base URL.
    #[arg(long, global = true, default_value = "https://api.daleelfm.com")]
    url: String,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the top-level sections or categories of an area.
    Sections {
        /// protocols | powerpoints | essentials | handbook
        area: String,
    },
    /// List the chapters of a section.
    Chapters { area: String, section: String },
    /// List the lessons of a chapter (deep areas) or a category (shallow).
    Lessons {
        area: String,
        section: String,
        chapter: Option<String>,
    },
    /// Show a lesson's content.
    Lesson {
        area: String,
        section: String,
        lesson: String,
        #[arg(long)]
        chapter: Option<String>,
    },
    /// Restore a browse state from a shared query string and print the tree.
    Browse {
        area: String,
        /// Query string, e.g. "sec=cardio&ch=ecg&ls=axis".
        query: String,
    },
    /// Create an exam.
    Exam {
        name: String,
        #[arg(long, default_value_t = 10)]
        questions: u32,
        #[arg(long, default_value = "study")]
        mode: String,
        #[arg(long, default_value = "untimed")]
        time_mode: String,
        #[arg(long, default_value = "all")]
        question_type: String,
        #[arg(long, default_value = "all")]
        chapters_type: String,
        #[arg(long)]
        section_id: Option<i64>,
        #[arg(long, value_delimiter = ',')]
        chapters: Vec<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .expect("Failed to initialize logger");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = DaleelClient::builder().url(&cli.url).build();

    match cli.command {
        Command::Sections { area } => {
            let area: ContentArea = area.parse()?;
            let response = client.list_roots(area).await?;
            debug!("listed {} roots (cached: {})", response.data().len(), response.is_cached());
            for summary in response.data() {
                print_summary(summary);
            }
        }
        Command::Chapters { area, section } => {
            let area: ContentArea = area.parse()?;
            let response = client.list_chapters(area, &section).await?;
            for summary in response.data() {
                print_summary(summary);
            }
        }
        Command::Lessons {
            area,
            section,
            chapter,
        } => {
            let area: ContentArea = area.parse()?;
            let response = match chapter {
                Some(chapter) => client.list_lessons(area, &section, &chapter).await?,
                None => client.list_category_items(area, &section).await?,
            };
            for summary in response.data() {
                print_summary(summary);
            }
        }
        Command::Lesson {
            area,
            section,
            lesson,
            chapter,
        } => {
            let area: ContentArea = area.parse()?;
            let response = client
                .get_lesson(area, &section, chapter.as_deref(), &lesson)
                .await?;
            let content = response.data();
            println!("{}", content.title);
            println!("published: {}", content.created_at.format("%Y-%m-%d"));
            if let Some(views) = content.views_count {
                println!("views: {views}");
            }
            if let Some(file) = &content.file {
                let kind = content.file_kind().unwrap_or(FileKind::Other);
                println!("file ({kind:?}): {file}");
            }
            if let Some(body) = &content.body {
                println!("\n{body}");
            }
        }
        Command::Browse { area, query } => {
            let area: ContentArea = area.parse()?;
            let selection = Selection::parse(&query);
            let mut navigator = TreeNavigator::new(area, client.clone())
                .with_cancellation(client.cancellation_token());

            navigator.load_roots().await?;
            navigator.restore(&selection).await?;
            print_tree(navigator.state());
        }
        Command::Exam {
            name,
            questions,
            mode,
            time_mode,
            question_type,
            chapters_type,
            section_id,
            chapters,
        } => {
            let form = ExamForm {
                name,
                mode: mode.parse()?,
                questions_number: questions,
                time_mode: time_mode.parse()?,
                question_type: question_type.parse()?,
                chapters_type: chapters_type.parse()?,
                section_id,
                chapters,
            };
            let created = client.create_exam(&form).await?;
            println!("created exam {}", created.id);
        }
    }

    Ok(())
}

fn print_summary(summary: &daleel_lib::model::NodeSummary) {
    match summary.questions_count {
        Some(count) => println!("{:<24} {} ({count} questions)", summary.slug, summary.title),
        None => println!("{:<24} {}", summary.slug, summary.title),
    }
}

/// Prints the forest with expansion and selection markers.
fn print_tree(state: &TreeState) {
    fn walk(state: &TreeState, nodes: &[TreeNode], depth: usize) {
        for node in nodes {
            let marker = if node.is_leaf() {
                if state.selected_leaf() == Some(node.id.as_str()) {
                    "*"
                } else {
                    " "
                }
            } else if state.is_expanded(&node.id) {
                "-"
            } else {
                "+"
            };
            println!("{}{} {} ({})", "  ".repeat(depth), marker, node.title, node.id);

            if state.is_expanded(&node.id) {
                match &node.children {
                    ChildrenState::Unloaded => {
                        println!("{}  ...", "  ".repeat(depth + 1));
                    }
                    ChildrenState::Loaded(children) => walk(state, children, depth + 1),
                }
            }
        }
    }
    walk(state, state.items(), 0);
}

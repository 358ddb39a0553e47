mod config;
mod deck;
mod dictation;

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use companion_core::profile::{
    ExplanationStyle, GradeLevel, StudentPersona, StudentProfile, Subject, UnderstandingLevel,
};
use companion_core::{
    FeedbackService, HttpFeedbackClient, HttpSlideChangeSink, NotificationChannel,
    RecognizedSegment, Sender, SlideContext, SpeechCaptureEngine, SpeechEvent, ViewerController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::config::Config;
use crate::deck::UploadClient;
use crate::dictation::LoopbackDictation;

#[derive(Parser)]
struct Cli {
    /// Slide manifest (the JSON the upload service returns) or, with
    /// --upload, the deck file to upload.
    deck: PathBuf,

    /// Upload the deck file to the backend instead of reading a manifest.
    #[arg(long)]
    upload: bool,

    /// Grade level of the simulated student.
    #[arg(long, default_value = "college-intro")]
    grade_level: GradeLevel,

    /// Subject of the presentation.
    #[arg(long, default_value = "general")]
    subject: Subject,

    /// Understanding level of the simulated student.
    #[arg(long, default_value = "on-level")]
    student_level: UnderstandingLevel,

    /// Explanation style the student asks for.
    #[arg(long, default_value = "step-by-step")]
    explanation_style: ExplanationStyle,

    /// Persona of the simulated student.
    #[arg(long, default_value = "curious")]
    student_persona: StudentPersona,
}

const HELP: &str = "\
:next, :n     show the next slide
:prev, :p     show the previous slide
:chat         toggle the chat panel
:record       start dictating (each typed line becomes part of the question)
:stop         finish dictating and send the question
:help         show this help
:quit, :q     exit
anything else ask the assistant about the current slide";

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    let profile = StudentProfile {
        grade_level: args.grade_level,
        subject: args.subject,
        understanding_level: args.student_level,
        explanation_style: args.explanation_style,
        student_persona: args.student_persona,
    };

    // --- 4. Push the Student Profile (best-effort) ---
    if let Err(e) = push_settings(&config.settings_endpoint(), &profile).await {
        tracing::warn!("failed to push the student profile: {e:?}");
    }

    // --- 5. Load the Deck ---
    let descriptors = if args.upload {
        UploadClient::new(config.upload_endpoint())
            .upload_deck(&args.deck, &profile)
            .await
            .context("Failed to upload the deck")?
    } else {
        deck::load_manifest(&args.deck)
            .await
            .context("Failed to read the slide manifest")?
    };
    anyhow::ensure!(!descriptors.is_empty(), "the deck has no slides");
    let slides = SlideContext::from_descriptors(descriptors);
    tracing::info!("Loaded {} slides.", slides.len());

    // --- 6. Wire the Viewer ---
    let service = Arc::new(HttpFeedbackClient::new(config.feedback_endpoint()));
    let notifier = NotificationChannel::new(Arc::new(HttpSlideChangeSink::new(
        config.slide_change_endpoint(),
    )));
    let engine = SpeechCaptureEngine::new(Some(Box::new(LoopbackDictation)));
    let mut controller = ViewerController::new(slides, engine, notifier, service);

    println!("Slide Companion — type :help for commands.");
    run_repl(&mut controller).await
}

async fn push_settings(endpoint: &str, profile: &StudentProfile) -> Result<()> {
    reqwest::Client::new()
        .post(endpoint)
        .json(profile)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

async fn run_repl<S>(controller: &mut ViewerController<S>) -> Result<()>
where
    S: FeedbackService + Send + Sync,
{
    print_slide(controller);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let prompt = if controller.ui_state().is_recording {
            "… "
        } else {
            "> "
        };
        print!("{prompt}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":help" => println!("{HELP}"),
            ":next" | ":n" => {
                controller.next_slide();
                print_slide(controller);
            }
            ":prev" | ":p" => {
                controller.previous_slide();
                print_slide(controller);
            }
            ":chat" => {
                controller.toggle_chat_panel();
                if controller.ui_state().is_chat_panel_open {
                    print_messages(controller, 0);
                } else {
                    println!("(chat panel hidden)");
                }
            }
            ":record" => {
                controller.start_recording().await;
                if controller.ui_state().is_recording {
                    println!("(listening — type your question, then :stop)");
                }
            }
            ":stop" => {
                let before = controller.chat_log().len();
                controller.stop_recording().await;
                // The loopback capability has no real event stream, so the
                // terminal end event is delivered here.
                controller.handle_speech_event(SpeechEvent::Ended).await;
                print_messages(controller, before);
            }
            "" => {}
            text => {
                if controller.ui_state().is_recording {
                    controller
                        .handle_speech_event(SpeechEvent::Result(vec![
                            RecognizedSegment::final_segment(text),
                        ]))
                        .await;
                    println!("(heard so far: {})", controller.live_transcript());
                } else {
                    let before = controller.chat_log().len();
                    controller.send_chat(text).await;
                    print_messages(controller, before);
                }
            }
        }
    }

    Ok(())
}

fn print_slide<S>(controller: &ViewerController<S>)
where
    S: FeedbackService + Send + Sync,
{
    match controller.current_slide() {
        Some(slide) => println!(
            "Slide {}/{} — {}",
            controller.ui_state().current_slide_index + 1,
            controller.slide_count(),
            slide.image_url
        ),
        None => println!("No slides loaded."),
    }
}

fn print_messages<S>(controller: &ViewerController<S>, since: usize)
where
    S: FeedbackService + Send + Sync,
{
    for message in &controller.chat_log()[since..] {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant => "student",
        };
        println!("[{who}] {}", message.text);
    }
}

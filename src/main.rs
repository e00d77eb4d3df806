// ABOUTME: Main entry point for the carousel-slides program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::{bail, Context};
use carousel_slides::model::{
    parse_hex_color, BackgroundPattern, FontFamily, SlideLayout, PALETTES,
};
use carousel_slides::{
    render_slide_html, restructure, split_prompt, write_html_to_file, AppContext, Config,
    ExportOptions, Slide, SlidePatch, SplitText,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the saved slides, profile and settings
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a slide from a prompt and select it
    Generate {
        prompt: String,

        /// Structure the prompt with the Gemini API instead of locally
        #[arg(long)]
        remote: bool,
    },

    /// Generate a title slide plus one slide per point
    Outline { text: String },

    /// Rewrite the selected slide from pasted text
    Restructure { text: String },

    /// Print how a text would be split, without saving anything
    Split {
        text: String,

        /// Use the line-based heuristics instead of word counts
        #[arg(long)]
        restructure: bool,
    },

    /// Append a placeholder slide
    Add,

    /// List all slides
    List,

    /// Print the selected slide
    Show,

    /// Edit a slide's text
    Edit(EditArgs),

    /// Delete a slide by id
    Delete { id: String },

    /// Show or hide the slide at an index
    Toggle { index: usize },

    /// Move a slide to a new position
    Move { from: usize, to: usize },

    /// Select the slide at an index
    Select { index: usize },

    /// Select the next slide
    Next,

    /// Select the previous slide
    Prev,

    /// Show or change the author profile
    Profile(ProfileArgs),

    /// Show or change the design settings
    Settings(SettingsArgs),

    /// Render the selected slide to HTML
    Render {
        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the visible slides to a PDF
    Export {
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page edge in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,
    },
}

#[derive(Args)]
struct EditArgs {
    /// Slide to edit (defaults to the selected slide)
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    subtitle: Option<String>,

    #[arg(long)]
    content: Option<String>,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    handle: Option<String>,

    /// Image file to use as the avatar
    #[arg(long)]
    avatar: Option<PathBuf>,
}

#[derive(Args)]
struct SettingsArgs {
    /// Palette number
    #[arg(long)]
    palette: Option<usize>,

    /// centered, standard, left-aligned or right-aligned
    #[arg(long)]
    layout: Option<String>,

    /// sans, serif, mono or poppins
    #[arg(long)]
    font: Option<String>,

    /// Decorative pattern name
    #[arg(long)]
    background: Option<String>,

    /// Turn the decorative pattern off
    #[arg(long)]
    no_background: bool,

    /// Three hex colors: background, accent, surface
    #[arg(long, value_delimiter = ',')]
    custom_colors: Option<Vec<String>>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let result = match cli.command {
        Some(command) => run(command, cli.state_dir),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, state_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::from_env();
    if let Some(dir) = state_dir {
        config.state_dir = dir;
    }

    // Pure text commands never touch the saved state
    if let Commands::Split { text, restructure: lines } = &command {
        let split = if *lines {
            restructure(text)
        } else {
            split_prompt(text)
        };
        print_split(&split);
        return Ok(());
    }

    let remote = matches!(command, Commands::Generate { remote: true, .. });
    let mut app = AppContext::open(&config, remote).context("Failed to set up the session")?;

    match command {
        Commands::Split { .. } => {}
        Commands::Generate { prompt, .. } => {
            let slide = app.generate(&prompt)?;
            print_slide(&slide);
        }
        Commands::Outline { text } => {
            let created = app.generate_outline(&text)?;
            println!("Created {} slides", created.len());
        }
        Commands::Restructure { text } => {
            let slide = app.restructure_selected(&text)?;
            print_slide(&slide);
        }
        Commands::Add => {
            let slide = Slide::placeholder(app.profile.get());
            let id = app.slides.lock().add(slide)?;
            println!("Added {}", id);
        }
        Commands::List => {
            let slides = app.slides.lock();
            for (index, slide) in slides.slides().iter().enumerate() {
                let marker = if index == slides.cursor() { '>' } else { ' ' };
                let hidden = if slide.visible { "" } else { " (hidden)" };
                println!("{} {:>2}  {}  {}{}", marker, index, slide.id, slide.title, hidden);
            }
        }
        Commands::Show => {
            let slide = app.slides.lock().selected().clone();
            println!("{}", serde_json::to_string_pretty(&slide)?);
        }
        Commands::Edit(args) => {
            let patch = SlidePatch {
                title: args.title,
                subtitle: args.subtitle,
                content: args.content,
                ..SlidePatch::default()
            };
            if patch.is_empty() {
                bail!("Nothing to edit. Pass --title, --subtitle or --content");
            }
            let mut slides = app.slides.lock();
            match args.id {
                Some(id) => slides.update(&id, &patch)?,
                None => slides.update_selected(&patch)?,
            }
        }
        Commands::Delete { id } => {
            if !app.slides.lock().delete(&id)? {
                println!("The last remaining slide cannot be deleted");
            }
        }
        Commands::Toggle { index } => {
            let visible = app.slides.lock().toggle_visible(index)?;
            println!("Slide {} is now {}", index, if visible { "visible" } else { "hidden" });
        }
        Commands::Move { from, to } => app.slides.lock().move_slide(from, to)?,
        Commands::Select { index } => app.slides.lock().set_cursor(index)?,
        Commands::Next => {
            println!("Selected slide {}", app.slides.lock().select_next());
        }
        Commands::Prev => {
            println!("Selected slide {}", app.slides.lock().select_previous());
        }
        Commands::Profile(args) => {
            if args.name.is_some() || args.handle.is_some() {
                app.profile.update(|profile| {
                    if let Some(name) = args.name {
                        profile.name = name;
                    }
                    if let Some(handle) = args.handle {
                        profile.handle = handle;
                    }
                })?;
            }
            if let Some(path) = args.avatar {
                app.set_avatar_from_file(&path)
                    .with_context(|| format!("Failed to use {:?} as avatar", path))?;
            }
            println!("{}", serde_json::to_string_pretty(app.profile.get())?);
        }
        Commands::Settings(args) => {
            apply_settings(&mut app, args)?;
            println!("{}", serde_json::to_string_pretty(app.settings.get())?);
        }
        Commands::Render { output } => {
            let slide = app.slides.lock().selected().clone();
            let html = render_slide_html(&slide, app.settings.get(), config.canvas_size);
            match output {
                Some(path) => {
                    write_html_to_file(&html, &path)?;
                    println!("HTML written to {:?}", path);
                }
                None => println!("{}", html),
            }
        }
        Commands::Export { output, size } => {
            let title = ExportOptions::title_for(app.profile.get());
            let options = config.get_export_options(output, size, Some(title));
            let report = app.export(&options, &config.get_render_config(size))?;
            println!("Exported {} pages to {:?}", report.pages, report.output);
        }
    }

    app.remember_selection()?;
    Ok(())
}

fn apply_settings(app: &mut AppContext, args: SettingsArgs) -> anyhow::Result<()> {
    if let Some(palette) = args.palette {
        if palette >= PALETTES.len() {
            bail!("Palette must be between 0 and {}", PALETTES.len() - 1);
        }
    }
    let layout = match args.layout.as_deref() {
        Some(value) => Some(
            SlideLayout::parse(value).with_context(|| format!("Unknown layout '{}'", value))?,
        ),
        None => None,
    };
    let font = match args.font.as_deref() {
        Some(value) => {
            Some(FontFamily::parse(value).with_context(|| format!("Unknown font '{}'", value))?)
        }
        None => None,
    };
    let background = match args.background.as_deref() {
        Some(value) => Some(
            BackgroundPattern::parse(value)
                .with_context(|| format!("Unknown background '{}'", value))?,
        ),
        None => None,
    };
    if let Some(colors) = &args.custom_colors {
        if colors.len() != 3 {
            bail!("Expected three custom colors, got {}", colors.len());
        }
        if let Some(bad) = colors.iter().find(|c| parse_hex_color(c).is_none()) {
            bail!("Not a hex color: {}", bad);
        }
    }

    app.settings.update(|settings| {
        if let Some(palette) = args.palette {
            settings.color_palette = palette;
            settings.use_custom_colors = false;
        }
        if let Some(layout) = layout {
            settings.slide_layout = layout;
        }
        if let Some(font) = font {
            settings.font_family = font;
        }
        if let Some(background) = background {
            settings.background_element = background;
            settings.background_enabled = true;
        }
        if args.no_background {
            settings.background_enabled = false;
        }
        if let Some(colors) = args.custom_colors {
            settings.custom_colors = colors;
            settings.use_custom_colors = true;
        }
    })?;
    Ok(())
}

fn print_split(split: &SplitText) {
    println!("Heading:    {}", split.heading);
    println!("Subheading: {}", split.subheading);
    println!("Content:    {}", split.content);
}

fn print_slide(slide: &Slide) {
    println!("{}", slide.id);
    println!("  Title:    {}", slide.title);
    println!("  Subtitle: {}", slide.subtitle);
    println!("  Content:  {}", slide.content);
}

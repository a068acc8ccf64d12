//! `htmldown` command line tool.
//!
//! Reads HTML from a file or stdin and writes Markdown to stdout or a file.
//! Options come from an optional JSON config file, overlaid by flags.

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use htmldown::{
    decode_input, language_from_class, parser_from_name, ConversionOptions, HeadingStyle,
    HighlightStyle, HtmldownService, ListIndentType, NewlineStyle, ParsingOptions,
    PreprocessingOptions, StreamingOptions, StrongEmSymbol, WhitespaceMode,
};
use log::{debug, info};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "htmldown", version, about = "Convert HTML to Markdown", long_about = None)]
struct Cli {
    /// Input HTML file (`-` or omitted reads stdin)
    input: Option<PathBuf>,

    /// Write Markdown to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with conversion options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    heading_style: Option<HeadingStyleArg>,

    /// Bullet characters, cycled by nesting depth
    #[arg(long)]
    bullets: Option<String>,

    #[arg(long, value_enum)]
    list_indent_type: Option<ListIndentArg>,

    #[arg(long)]
    list_indent_width: Option<usize>,

    #[arg(long, value_enum)]
    strong_em_symbol: Option<StrongEmArg>,

    #[arg(long)]
    no_escape_asterisks: bool,

    #[arg(long)]
    no_escape_underscores: bool,

    #[arg(long)]
    no_escape_misc: bool,

    #[arg(long)]
    no_autolinks: bool,

    /// Use the link target as title when a link has none
    #[arg(long)]
    default_title: bool,

    #[arg(long, value_enum)]
    newline_style: Option<NewlineArg>,

    #[arg(long, value_enum)]
    highlight_style: Option<HighlightArg>,

    /// Default fence language for code blocks
    #[arg(long)]
    code_language: Option<String>,

    /// Take fence languages from `language-*` classes
    #[arg(long)]
    code_language_from_class: bool,

    #[arg(long)]
    wrap: bool,

    #[arg(long)]
    wrap_width: Option<usize>,

    /// Tags to leave unconverted (comma separated)
    #[arg(long, value_delimiter = ',')]
    strip: Option<Vec<String>>,

    /// Only convert these tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    convert: Option<Vec<String>>,

    #[arg(long, value_enum)]
    whitespace_mode: Option<WhitespaceArg>,

    /// Parents in which images stay images in inline mode (comma separated)
    #[arg(long, value_delimiter = ',')]
    keep_inline_images_in: Option<Vec<String>>,

    #[arg(long)]
    br_in_tables: bool,

    #[arg(long)]
    sub_symbol: Option<String>,

    #[arg(long)]
    sup_symbol: Option<String>,

    /// Do not prepend the <head> metadata comment
    #[arg(long)]
    no_metadata: bool,

    #[arg(long)]
    convert_as_inline: bool,

    #[arg(long)]
    strip_newlines: bool,

    /// Input encoding label (e.g. utf-8, latin1)
    #[arg(long)]
    encoding: Option<String>,

    /// HTML parser: html5ever (aliases scraper, html.parser) or tl
    #[arg(long)]
    parser: Option<String>,

    /// Drop navigation and form content
    #[arg(long)]
    preprocess: bool,

    #[arg(long, requires = "preprocess")]
    keep_navigation: bool,

    #[arg(long, requires = "preprocess")]
    keep_forms: bool,

    /// Write output in chunks of this many bytes
    #[arg(long, default_value_t = 8192)]
    chunk_size: usize,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeadingStyleArg {
    Underlined,
    Atx,
    AtxClosed,
}

impl From<HeadingStyleArg> for HeadingStyle {
    fn from(arg: HeadingStyleArg) -> Self {
        match arg {
            HeadingStyleArg::Underlined => HeadingStyle::Underlined,
            HeadingStyleArg::Atx => HeadingStyle::Atx,
            HeadingStyleArg::AtxClosed => HeadingStyle::AtxClosed,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListIndentArg {
    Spaces,
    Tabs,
}

impl From<ListIndentArg> for ListIndentType {
    fn from(arg: ListIndentArg) -> Self {
        match arg {
            ListIndentArg::Spaces => ListIndentType::Spaces,
            ListIndentArg::Tabs => ListIndentType::Tabs,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrongEmArg {
    #[value(name = "*")]
    Asterisk,
    #[value(name = "_")]
    Underscore,
}

impl From<StrongEmArg> for StrongEmSymbol {
    fn from(arg: StrongEmArg) -> Self {
        match arg {
            StrongEmArg::Asterisk => StrongEmSymbol::Asterisk,
            StrongEmArg::Underscore => StrongEmSymbol::Underscore,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NewlineArg {
    Spaces,
    Backslash,
}

impl From<NewlineArg> for NewlineStyle {
    fn from(arg: NewlineArg) -> Self {
        match arg {
            NewlineArg::Spaces => NewlineStyle::Spaces,
            NewlineArg::Backslash => NewlineStyle::Backslash,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HighlightArg {
    DoubleEqual,
    Html,
    Bold,
}

impl From<HighlightArg> for HighlightStyle {
    fn from(arg: HighlightArg) -> Self {
        match arg {
            HighlightArg::DoubleEqual => HighlightStyle::DoubleEqual,
            HighlightArg::Html => HighlightStyle::Html,
            HighlightArg::Bold => HighlightStyle::Bold,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WhitespaceArg {
    Normalized,
    Strict,
}

impl From<WhitespaceArg> for WhitespaceMode {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::Normalized => WhitespaceMode::Normalized,
            WhitespaceArg::Strict => WhitespaceMode::Strict,
        }
    }
}

/// Config file layout: conversion options at the top level, plus optional
/// `parsing` and `preprocessing` sections
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    #[serde(flatten)]
    conversion: ConversionOptions,
    parsing: ParsingOptions,
    preprocessing: PreprocessingOptions,
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))
}

impl Cli {
    fn apply(&self, config: &mut ConfigFile) -> Result<()> {
        let options = &mut config.conversion;
        if let Some(style) = self.heading_style {
            options.heading_style = style.into();
        }
        if let Some(bullets) = &self.bullets {
            options.bullets = bullets.clone();
        }
        if let Some(kind) = self.list_indent_type {
            options.list_indent_type = kind.into();
        }
        if let Some(width) = self.list_indent_width {
            options.list_indent_width = width;
        }
        if let Some(symbol) = self.strong_em_symbol {
            options.strong_em_symbol = symbol.into();
        }
        options.escape_asterisks &= !self.no_escape_asterisks;
        options.escape_underscores &= !self.no_escape_underscores;
        options.escape_misc &= !self.no_escape_misc;
        options.autolinks &= !self.no_autolinks;
        options.default_title |= self.default_title;
        if let Some(style) = self.newline_style {
            options.newline_style = style.into();
        }
        if let Some(style) = self.highlight_style {
            options.highlight_style = style.into();
        }
        if let Some(language) = &self.code_language {
            options.code_language = language.clone();
        }
        options.wrap |= self.wrap;
        if let Some(width) = self.wrap_width {
            options.wrap_width = width;
        }
        if self.strip.is_some() {
            options.strip = self.strip.clone();
        }
        if self.convert.is_some() {
            options.convert = self.convert.clone();
        }
        if let Some(mode) = self.whitespace_mode {
            options.whitespace_mode = mode.into();
        }
        if let Some(parents) = &self.keep_inline_images_in {
            options.keep_inline_images_in = parents.clone();
        }
        options.br_in_tables |= self.br_in_tables;
        if let Some(symbol) = &self.sub_symbol {
            options.sub_symbol = symbol.clone();
        }
        if let Some(symbol) = &self.sup_symbol {
            options.sup_symbol = symbol.clone();
        }
        options.extract_metadata &= !self.no_metadata;
        options.convert_as_inline |= self.convert_as_inline;
        options.strip_newlines |= self.strip_newlines;

        if let Some(encoding) = &self.encoding {
            config.parsing.encoding = encoding.clone();
        }
        if let Some(name) = &self.parser {
            config.parsing.parser = parser_from_name(name)?;
        }
        if self.preprocess {
            config.preprocessing.enabled = true;
            config.preprocessing.remove_navigation = !self.keep_navigation;
            config.preprocessing.remove_forms = !self.keep_forms;
        }
        Ok(())
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config)?;
    debug!("conversion options: {:?}", config.conversion);

    let mut service = HtmldownService::with_options(config.conversion);
    service
        .set_parsing(config.parsing)
        .set_preprocessing(config.preprocessing);
    if cli.code_language_from_class {
        service.with_code_language(Arc::new(language_from_class));
    }

    let bytes = read_input(cli.input.as_deref())?;
    let html = decode_input(&bytes, &service.parsing().encoding)?;
    info!("read {} bytes of HTML", bytes.len());

    let chunks = service.convert_stream(&html, StreamingOptions::default().with_chunk_size(cli.chunk_size))?;
    let mut output = open_output(cli.output.as_deref())?;
    for chunk in chunks {
        output.write_all(chunk?.as_bytes()).context("failed to write output")?;
    }
    output.flush().context("failed to write output")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli).context("conversion failed")
}

//! Lorikeet CLI
//!
//! Deserializes an HTML fragment and prints the resulting part tree,
//! for debugging what a renderer would be handed.

use anyhow::Result;
use lorikeet_html::{Part, deserialize};
use lorikeet_media::MediaRepository;
use owo_colors::OwoColorize;
use std::env;
use std::fs;
use std::process;

fn usage() -> ! {
    eprintln!("Usage: lorikeet-cli [--json] [--media-base <url>] <file.html>");
    eprintln!("       lorikeet-cli [--json] [--media-base <url>] --html '<fragment>'");
    process::exit(1);
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut html: Option<String> = None;
    let mut media_base = String::from("https://chat.example.org");
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => json = true,
            "--media-base" => {
                i += 1;
                media_base = args.get(i).cloned().unwrap_or_else(|| usage());
            }
            "--html" => {
                i += 1;
                html = Some(args.get(i).cloned().unwrap_or_else(|| usage()));
            }
            path if html.is_none() => html = Some(fs::read_to_string(path)?),
            _ => usage(),
        }
        i += 1;
    }
    let Some(html) = html else { usage() };

    let media = MediaRepository::new(&media_base)?;
    let doc = deserialize(&html, &media);

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("=== Parts ({} top-level) ===", doc.parts.len());
        for part in &doc.parts {
            print_part(part, 0);
        }
    }

    Ok(())
}

/// Print one part and its children as an indented tree.
fn print_part(part: &Part, depth: usize) {
    let pad = "  ".repeat(depth);
    match part {
        Part::Text(content) => println!("{pad}{} {content:?}", "Text".green()),
        Part::Format { tag, children } => {
            println!("{pad}{} <{tag}>", "Format".cyan());
            for child in children {
                print_part(child, depth + 1);
            }
        }
        Part::NewLine => println!("{pad}{}", "NewLine".dimmed()),
        Part::Rule => println!("{pad}{}", "Rule".dimmed()),
        Part::Link { href, children } => {
            println!("{pad}{} {href}", "Link".blue());
            for child in children {
                print_part(child, depth + 1);
            }
        }
        Part::Pill { user_id, href, children } => {
            println!("{pad}{} {user_id} ({href})", "Pill".magenta());
            for child in children {
                print_part(child, depth + 1);
            }
        }
        Part::Image { url, width, height, .. } => {
            println!("{pad}{} {url} ({width:?} x {height:?})", "Image".yellow());
        }
        Part::Header { level, children } => {
            println!("{pad}{} h{level}", "Header".cyan());
            for child in children {
                print_part(child, depth + 1);
            }
        }
        Part::List { start, items } => {
            println!("{pad}{} start={start:?}", "List".cyan());
            for item in items {
                println!("{pad}  -");
                for child in item {
                    print_part(child, depth + 2);
                }
            }
        }
        Part::CodeBlock { language, text } => {
            println!("{pad}{} [{language}] {text:?}", "CodeBlock".yellow());
        }
    }
}

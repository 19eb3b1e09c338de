use colored::*;
use face_compare_core::{SelectionEvent, Session, Slot, SlotUpdate, View};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::{actions, render};

const HELP: &str = "\
Commands:
  history                 list staged images (switches to the history view)
  select <n|path>         select history entry n (1 = newest) or a listed path
  use <first|second>      put the selected image into a slot
  set <first|second> <p>  put an arbitrary image path into a slot
  show                    show both slots and the current selection
  compare                 stage both slots and run the comparator
  clear                   delete every staged image
  help                    show this message
  quit                    leave the shell";

/// The two comparison inputs as the user currently sees them.
#[derive(Debug, Default)]
struct Slots {
    first: Option<PathBuf>,
    second: Option<PathBuf>,
}

impl Slots {
    fn set(&mut self, slot: Slot, path: PathBuf) {
        match slot {
            Slot::First => self.first = Some(path),
            Slot::Second => self.second = Some(path),
        }
    }

    fn print(&self) {
        for (name, value) in [("first", &self.first), ("second", &self.second)] {
            match value {
                Some(path) => println!("  {:<6} {}", name.cyan(), path.display()),
                None => println!("  {:<6} {}", name.cyan(), "(empty)".dimmed()),
            }
        }
    }
}

/// Interactive loop over one session. The selection lives as long as the loop does.
pub fn run(mut session: Session) -> io::Result<()> {
    let mut slots = Slots::default();
    let mut view = View::Compare;
    let stdin = io::stdin();
    let mut line = String::new();

    println!("Staging directory: {}", session.upload_dir().display());
    println!("{}", HELP.dimmed());

    loop {
        let label = match view {
            View::Compare => "compare",
            View::History => "history",
        };
        print!("{} ", format!("[{}]>", label).cyan());
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let input = line.trim();
        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "history" => {
                view = View::History;
                render::print_history(&session.list_history());
            }
            "select" => select(&mut session, rest),
            "use" => match rest.parse::<Slot>() {
                Ok(slot) => {
                    let update = session.apply_to(slot);
                    view = apply_update(&mut slots, update);
                }
                Err(err) => println!("{}", err.to_string().red()),
            },
            "set" => {
                let (slot, path) = rest.split_once(' ').unwrap_or((rest, ""));
                match slot.parse::<Slot>() {
                    Ok(_) if path.trim().is_empty() => println!("{}", "usage: set <first|second> <path>".red()),
                    Ok(slot) => {
                        slots.set(slot, PathBuf::from(path.trim()));
                        slots.print();
                    }
                    Err(err) => println!("{}", err.to_string().red()),
                }
            }
            "show" => {
                slots.print();
                match session.selected() {
                    Some(path) => println!("  {:<6} {}", "picked".cyan(), path.display()),
                    None => println!("  {:<6} {}", "picked".cyan(), "(nothing)".dimmed()),
                }
            }
            "compare" => {
                view = View::Compare;
                let submission =
                    session.submit_comparison(slots.first.as_deref(), slots.second.as_deref());
                render::print_outcome(&submission.outcome);
            }
            "clear" => actions::clear(&mut session, false)?,
            other => println!("{} `{}`, try `help`", "unknown command".red(), other),
        }
    }

    Ok(())
}

fn select(session: &mut Session, arg: &str) {
    if arg.is_empty() {
        println!("{}", "usage: select <n|path>".red());
        return;
    }

    match arg.parse::<usize>() {
        Ok(number) => match number
            .checked_sub(1)
            .and_then(|index| session.select_from_history(index))
        {
            Some(path) => println!("Selected {}", path.display()),
            None => println!("{} {}", "no history entry".red(), number),
        },
        Err(_) => match session.select(SelectionEvent::new(arg)) {
            Ok(path) => println!("Selected {}", path.display()),
            Err(err) => println!("{}", err.to_string().red()),
        },
    }
}

/// Fills the slot if there was a selection; the view switch happens regardless.
fn apply_update(slots: &mut Slots, update: SlotUpdate) -> View {
    match update.path {
        Some(path) => {
            println!("Using {} as the {} image", path.display(), update.slot);
            slots.set(update.slot, path);
        }
        None => println!("{}", "Nothing selected, slot unchanged.".dimmed()),
    }
    if update.requested_view == View::Compare {
        slots.print();
    }
    update.requested_view
}

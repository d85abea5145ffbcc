use std::{
    env,
    error::Error,
    io::{self, Write},
    path::PathBuf,
};

use calcutext::{lines::split_lines, FileStorage, Line, Notepad, NotepadError, Segment};
use log::info;
use rand::rngs::ThreadRng;

type Session = Notepad<FileStorage, ThreadRng>;

const DEFAULT_DIR: &str = ".calcutext";
const RESET: &str = "\x1b[0m";

const HELP: &str = "\
:list              list texts
:new               start a new text
:delete            delete the active text
:open N            switch to text N from :list
:title TITLE       rename the active text
:edit N [TEXT]     replace line N (empty TEXT clears it)
:click LINE COL    toggle the variable at LINE, COL
:color             next color for the active variable
:width [N]         show or set the editor width
:show              print the active text
:html              print the annotated markup and stylesheet
:quit              exit
anything else is appended as a new line";

fn storage_dir() -> PathBuf {
    env::args()
        .nth(1)
        .or_else(|| env::var("CALCUTEXT_DIR").ok())
        .unwrap_or_else(|| DEFAULT_DIR.to_owned())
        .into()
}

fn paint(line: &Line, session: &Session) -> String {
    let mut out = String::new();
    for segment in &line.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Variable { name, active } => {
                if *active {
                    out.push_str("\x1b[4m");
                }
                if let Some(color) = session.color_of(name) {
                    let (r, g, b) = color.rgb();
                    out.push_str(&format!("\x1b[38;2;{r};{g};{b}m"));
                }
                out.push_str(name);
                out.push_str(RESET);
            }
        }
    }
    out
}

fn show(session: &Session) {
    let text = session.active_text();
    println!("── {} ──", text.display_title());
    let columns = (session.settings().effective_width() / 10) as usize;
    for (i, line) in session.lines().iter().enumerate() {
        let padding = columns.saturating_sub(line.input.chars().count());
        let result = line
            .result
            .as_ref()
            .map(|r| format!("= {r}"))
            .unwrap_or_default();
        println!("{:>3} │ {}{} {}", i + 1, paint(line, session), " ".repeat(padding), result);
    }
}

fn list(session: &Session) {
    for (i, text) in session.texts().iter().enumerate() {
        let marker = if text.id == session.active_text_id() { '*' } else { ' ' };
        println!("{marker} {:>2}. {}", i + 1, text.display_title());
    }
}

fn parse_index(arg: &str) -> Option<usize> {
    arg.trim().parse::<usize>().ok()?.checked_sub(1)
}

/// Keeps the body's line endings when it already uses `\r\n`.
fn separator(body: &str) -> &'static str {
    if body.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn replace_line(body: &str, index: usize, replacement: &str) -> String {
    let mut lines = split_lines(body);
    if index >= lines.len() {
        lines.resize(index + 1, "");
    }
    lines[index] = replacement;
    lines.join(separator(body))
}

fn edit_line(session: &mut Session, args: &str) -> Result<(), NotepadError> {
    let (index, replacement) = args.split_once(' ').unwrap_or((args, ""));
    let Some(index) = parse_index(index) else {
        eprintln!("usage: :edit N [TEXT]");
        return Ok(());
    };
    let body = replace_line(&session.active_text().data.body, index, replacement);
    session.set_body(body)
}

fn append_line(session: &mut Session, input: &str) -> Result<(), NotepadError> {
    let body = &session.active_text().data.body;
    let body = if body.is_empty() {
        input.to_owned()
    } else {
        format!("{body}{}{input}", separator(body))
    };
    session.set_body(body)
}

/// Runs one command. Returns `false` once the session should end.
fn run(session: &mut Session, input: &str) -> Result<bool, NotepadError> {
    let (command, args) = input.split_once(' ').unwrap_or((input, ""));
    match command {
        ":quit" | ":q" => return Ok(false),
        ":help" => println!("{HELP}"),
        ":list" => list(session),
        ":new" => {
            session.add_text()?;
            list(session);
        }
        ":delete" => match session.delete_active_text() {
            Err(NotepadError::LastText) => eprintln!("You cannot delete the last calcutext."),
            other => {
                other?;
                list(session);
            }
        },
        ":open" => match parse_index(args).and_then(|i| session.texts().get(i)) {
            Some(text) => {
                let id = text.id;
                session.select_text(id)?;
                show(session);
            }
            None => eprintln!("no such text, see :list"),
        },
        ":title" => session.set_title(args.trim())?,
        ":edit" => {
            edit_line(session, args)?;
            show(session);
        }
        ":click" => {
            let mut numbers = args.split_whitespace().map(parse_index);
            match (numbers.next().flatten(), numbers.next().flatten()) {
                (Some(line), Some(column)) => {
                    session.click(line, column)?;
                    show(session);
                }
                _ => eprintln!("usage: :click LINE COL"),
            }
        }
        ":color" => match session.cycle_active_color()? {
            Some(color) => {
                show(session);
                println!("{} is now {color}", session.active_variable().unwrap_or_default());
            }
            None => eprintln!("no active variable, use :click first"),
        },
        ":width" => match args.trim() {
            "" => println!("{}", session.settings().effective_width()),
            width => match width.parse() {
                Ok(width) => {
                    session.set_width(Some(width))?;
                    show(session);
                }
                Err(err) => eprintln!("invalid width: {err}"),
            },
        },
        ":show" => show(session),
        ":html" => {
            for line in session.lines() {
                println!("{}", line.html());
            }
            print!("{}", session.stylesheet());
        }
        _ if command.starts_with(':') => eprintln!("unknown command {command}, try :help"),
        _ => {
            append_line(session, input)?;
            show(session);
        }
    }
    Ok(true)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env().init();

    let dir = storage_dir();
    info!("storing texts in {}", dir.display());
    let mut session: Session = Notepad::load(FileStorage::new(dir), rand::thread_rng())?;
    show(&session);

    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim_end_matches(&['\r', '\n'][..]);
        match run(&mut session, input) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_keep_line_endings() {
        assert_eq!(replace_line("a = 1\r\nb = 2", 1, "b = 3"), "a = 1\r\nb = 3");
        assert_eq!(replace_line("a = 1\nb = 2", 0, "a = 5"), "a = 5\nb = 2");
        assert_eq!(replace_line("a\r\nb", 3, "d"), "a\r\nb\r\n\r\nd");
        assert_eq!(replace_line("", 0, "x = 1"), "x = 1");
    }
}

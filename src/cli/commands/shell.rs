//! Interactive calculator shell
//!
//! A line-oriented session over a GPA course grid or a CGPA semester grid.
//! Rows are addressed by their 1-based position as shown by `show`.

use super::export::{print_rows, ExportTarget};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use unigrade::config::Config;
use unigrade::core::aggregate::CgpaMode;
use unigrade::core::collection::{EditableCollection, Record};
use unigrade::core::format::format_quantity;
use unigrade::core::models::{CourseField, RecordId, SemesterField};
use unigrade::core::session::{CgpaSession, GpaSession};
use unigrade::{debug, verbose};

const HELP: &str = "\
Commands:
  add                          add a row
  set ROW FIELD VALUE          edit a field of row ROW
  rm ROW                       remove row ROW
  calc                         calculate
  show                         list rows and the last result
  reset                        start over
  student NAME                 set the student name
  export FORMAT [PATH]         write the result (markdown, html, pdf, json)
  help                         this text
  quit                         leave the shell
CGPA only:
  mode totals|gpa              how semesters enter the CGPA
  course SEM add               add a course to semester SEM
  course SEM set ROW FIELD V   edit a course of semester SEM
  course SEM rm ROW            remove a course from semester SEM
  course SEM calc              compute semester SEM from its courses
Fields: code, units, grade (courses); name, tcr, tgp, gpa (semesters)";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a row
    Add,
    /// Edit a field of a row
    Set {
        /// 1-based row
        row: usize,
        /// Raw field name
        field: String,
        /// Raw value (may contain spaces)
        value: String,
    },
    /// Remove a row
    Remove(usize),
    /// Run the calculation
    Calculate,
    /// Print the rows and the last result
    Show,
    /// Reset the grid
    Reset,
    /// Set the student name
    Student(String),
    /// Switch the CGPA mode
    Mode(CgpaMode),
    /// Operate on a semester's course breakdown
    Course {
        /// 1-based semester row
        semester: usize,
        /// What to do with the breakdown
        action: CourseAction,
    },
    /// Export the last result
    Export {
        /// Format name
        format: String,
        /// Optional output path
        path: Option<PathBuf>,
    },
    /// Print usage
    Help,
    /// Leave the shell
    Quit,
}

/// Operation on a semester's course breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseAction {
    /// Add a course
    Add,
    /// Edit a course field
    Set {
        /// 1-based course row
        row: usize,
        /// Raw field name
        field: String,
        /// Raw value
        value: String,
    },
    /// Remove a course
    Remove(usize),
    /// Compute the semester from its courses
    Calculate,
}

/// Parse one input line; `Ok(None)` for a blank line
///
/// # Errors
/// Returns a message when the command or its arguments are malformed.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" | "new" => ShellCommand::Add,
        "set" => {
            let (row, field, value) = parse_set(&rest)?;
            ShellCommand::Set { row, field, value }
        }
        "rm" | "remove" | "del" => ShellCommand::Remove(parse_row(rest.first().copied())?),
        "calc" | "calculate" => ShellCommand::Calculate,
        "show" | "ls" | "list" => ShellCommand::Show,
        "reset" | "clear" => ShellCommand::Reset,
        "student" | "name" => ShellCommand::Student(rest.join(" ")),
        "mode" => {
            let mode = rest
                .first()
                .ok_or_else(|| "Usage: mode totals|gpa".to_string())?
                .parse()?;
            ShellCommand::Mode(mode)
        }
        "course" => {
            let semester = parse_row(rest.first().copied())?;
            let action = parse_course_action(rest.get(1..).unwrap_or_default())?;
            ShellCommand::Course { semester, action }
        }
        "export" => {
            let format = rest
                .first()
                .ok_or_else(|| "Usage: export FORMAT [PATH]".to_string())?
                .to_string();
            let path = (rest.len() > 1).then(|| PathBuf::from(rest[1..].join(" ")));
            ShellCommand::Export { format, path }
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{other}' (try help)")),
    };
    Ok(Some(command))
}

fn parse_course_action(words: &[&str]) -> Result<CourseAction, String> {
    let (verb, rest) = words
        .split_first()
        .ok_or_else(|| "Usage: course SEM add|set|rm|calc".to_string())?;
    match verb.to_ascii_lowercase().as_str() {
        "add" | "new" => Ok(CourseAction::Add),
        "set" => {
            let (row, field, value) = parse_set(rest)?;
            Ok(CourseAction::Set { row, field, value })
        }
        "rm" | "remove" | "del" => Ok(CourseAction::Remove(parse_row(rest.first().copied())?)),
        "calc" | "calculate" => Ok(CourseAction::Calculate),
        other => Err(format!("Unknown course action '{other}'")),
    }
}

fn parse_set(words: &[&str]) -> Result<(usize, String, String), String> {
    if words.len() < 2 {
        return Err("Usage: set ROW FIELD VALUE".to_string());
    }
    let row = parse_row(Some(words[0]))?;
    Ok((row, words[1].to_string(), words[2..].join(" ")))
}

fn parse_row(word: Option<&str>) -> Result<usize, String> {
    let word = word.ok_or_else(|| "Missing row number".to_string())?;
    match word.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(format!("Row must be a positive number, got '{word}'")),
    }
}

/// Calculator behind the shell
#[derive(Debug, Clone)]
pub enum Calculator {
    /// Semester GPA over courses
    Gpa(GpaSession),
    /// CGPA over semesters
    Cgpa(CgpaSession),
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this text and keep reading
    Continue(String),
    /// Leave the loop
    Quit,
}

/// Shell state
#[derive(Debug, Clone)]
pub struct Shell {
    calculator: Calculator,
}

impl Shell {
    /// Create a shell; the student name is taken from config
    #[must_use]
    pub fn new(cgpa: bool, mode: CgpaMode, config: &Config) -> Self {
        let calculator = if cgpa {
            let mut session = CgpaSession::new(mode);
            session.set_student_name(&config.report.student_name);
            Calculator::Cgpa(session)
        } else {
            let mut session = GpaSession::new();
            session.set_student_name(&config.report.student_name);
            Calculator::Gpa(session)
        };
        Self { calculator }
    }

    /// Prompt for the current calculator
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self.calculator {
            Calculator::Gpa(_) => "gpa> ",
            Calculator::Cgpa(_) => "cgpa> ",
        }
    }

    /// The calculator being driven
    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run one command
    ///
    /// # Errors
    /// Returns the text to show when the command is refused.
    pub fn execute(&mut self, command: ShellCommand, config: &Config) -> Result<Step, String> {
        debug!("Shell command: {command:?}");
        let text = match command {
            ShellCommand::Quit => return Ok(Step::Quit),
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Show => self.render(),
            ShellCommand::Add => self.add(),
            ShellCommand::Set { row, field, value } => self.set(row, &field, &value)?,
            ShellCommand::Remove(row) => self.remove(row)?,
            ShellCommand::Calculate => self.calculate()?,
            ShellCommand::Reset => {
                match &mut self.calculator {
                    Calculator::Gpa(session) => session.reset(),
                    Calculator::Cgpa(session) => session.reset(),
                }
                "✓ Reset".to_string()
            }
            ShellCommand::Student(name) => {
                match &mut self.calculator {
                    Calculator::Gpa(session) => session.set_student_name(&name),
                    Calculator::Cgpa(session) => session.set_student_name(&name),
                }
                format!("✓ Student: {}", name.trim())
            }
            ShellCommand::Mode(mode) => {
                let Calculator::Cgpa(session) = &mut self.calculator else {
                    return Err("✗ mode only applies to the CGPA calculator".to_string());
                };
                session.set_mode(mode);
                format!("✓ Mode: {mode}")
            }
            ShellCommand::Course { semester, action } => self.course(semester, action)?,
            ShellCommand::Export { format, path } => self.export(&format, path, config)?,
        };
        Ok(Step::Continue(text))
    }

    fn add(&mut self) -> String {
        let row = match &mut self.calculator {
            Calculator::Gpa(session) => {
                session.courses_mut().add();
                session.courses().len()
            }
            Calculator::Cgpa(session) => {
                session.semesters_mut().add();
                session.semesters().len()
            }
        };
        format!("✓ Added row {row}")
    }

    fn set(&mut self, row: usize, field: &str, value: &str) -> Result<String, String> {
        match &mut self.calculator {
            Calculator::Gpa(session) => {
                let field: CourseField = field.parse().map_err(|e| format!("✗ {e}"))?;
                let id = row_id(session.courses(), row)?;
                session
                    .courses_mut()
                    .update(id, field, value)
                    .map_err(notice_text)?;
            }
            Calculator::Cgpa(session) => {
                let field: SemesterField = field.parse().map_err(|e| format!("✗ {e}"))?;
                let id = row_id(session.semesters(), row)?;
                session
                    .semesters_mut()
                    .update(id, field, value)
                    .map_err(notice_text)?;
            }
        }
        Ok(format!("✓ Row {row} updated"))
    }

    fn remove(&mut self, row: usize) -> Result<String, String> {
        match &mut self.calculator {
            Calculator::Gpa(session) => {
                let id = row_id(session.courses(), row)?;
                session.courses_mut().remove(id).map_err(notice_text)?;
            }
            Calculator::Cgpa(session) => {
                let id = row_id(session.semesters(), row)?;
                session.semesters_mut().remove(id).map_err(notice_text)?;
            }
        }
        Ok(format!("✓ Removed row {row}"))
    }

    fn calculate(&mut self) -> Result<String, String> {
        match &mut self.calculator {
            Calculator::Gpa(session) => {
                session.calculate().map_err(notice_text)?;
            }
            Calculator::Cgpa(session) => {
                session.calculate().map_err(notice_text)?;
            }
        }
        verbose!("Shell calculation succeeded");
        Ok(self.render())
    }

    fn course(&mut self, semester: usize, action: CourseAction) -> Result<String, String> {
        let Calculator::Cgpa(session) = &mut self.calculator else {
            return Err("✗ course breakdowns only apply to the CGPA calculator".to_string());
        };
        let semester_id = row_id(session.semesters(), semester)?;
        let course_id = |session: &CgpaSession, row: usize| -> Result<RecordId, String> {
            session
                .semesters()
                .get(semester_id)
                .zip(row.checked_sub(1))
                .and_then(|(record, index)| record.courses.get(index))
                .map(unigrade::core::models::CourseRecord::id)
                .ok_or_else(|| format!("✗ Semester {semester} has no course {row}"))
        };

        match action {
            CourseAction::Add => {
                session.add_course(semester_id).map_err(notice_text)?;
                Ok(format!("✓ Added a course to semester {semester}"))
            }
            CourseAction::Set { row, field, value } => {
                let field: CourseField = field.parse().map_err(|e| format!("✗ {e}"))?;
                let id = course_id(session, row)?;
                session
                    .update_course(semester_id, id, field, &value)
                    .map_err(notice_text)?;
                Ok(format!("✓ Semester {semester} course {row} updated"))
            }
            CourseAction::Remove(row) => {
                let id = course_id(session, row)?;
                session
                    .remove_course(semester_id, id)
                    .map_err(notice_text)?;
                Ok(format!("✓ Removed course {row} from semester {semester}"))
            }
            CourseAction::Calculate => {
                let summary = session.compute_semester(semester_id).map_err(notice_text)?;
                Ok(format!(
                    "✓ Semester {semester}: TCR {}, TGP {}",
                    summary.total_credit_registered, summary.total_grade_points
                ))
            }
        }
    }

    fn export(
        &self,
        format: &str,
        path: Option<PathBuf>,
        config: &Config,
    ) -> Result<String, String> {
        let (stem, sheet) = match &self.calculator {
            Calculator::Gpa(session) => ("GPA-Result", session.result_sheet()),
            Calculator::Cgpa(session) => ("CGPA-Result", session.result_sheet()),
        };
        if sheet.is_none() {
            return Err("✗ Nothing to export yet (run calc first)".to_string());
        }

        let target = ExportTarget::resolve(Some(format), path.as_deref(), stem, config)?;
        let reporter = target.reporter(config);
        let written = match &self.calculator {
            Calculator::Gpa(session) => session.export(reporter.as_ref(), &target.path),
            Calculator::Cgpa(session) => session.export(reporter.as_ref(), &target.path),
        };
        written.map_err(notice_text)?;
        Ok(format!("✓ {} sheet written: {}", target.format, target.path.display()))
    }

    /// Text listing of the grid and the last result
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        match &self.calculator {
            Calculator::Gpa(session) => {
                for (index, course) in session.courses().records().iter().enumerate() {
                    let grade = course.grade.map_or_else(|| "-".to_string(), |g| g.to_string());
                    let points = course
                        .grade_points()
                        .map_or_else(String::new, |points| format!("  = {points}"));
                    out.push_str(&format!(
                        "{:>3}. {:<10} {:>3} units  {grade}{points}\n",
                        index + 1,
                        display_code(&course.code),
                        course.credit_units
                    ));
                }
                if session.courses().is_stale() {
                    out.push_str("(edited since the last calculation)\n");
                }
            }
            Calculator::Cgpa(session) => {
                for (index, semester) in session.semesters().records().iter().enumerate() {
                    out.push_str(&format!(
                        "{:>3}. {:<20} TCR {:>6}  TGP {:>7}  GPA {:.2}  ({} courses)\n",
                        index + 1,
                        semester.name,
                        format_quantity(semester.total_credit_registered()),
                        format_quantity(semester.total_grade_points()),
                        semester.gpa(),
                        semester.courses.len()
                    ));
                }
                if session.semesters().is_stale() {
                    out.push_str("(edited since the last calculation)\n");
                }
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn print_result(&self) {
        let sheet = match &self.calculator {
            Calculator::Gpa(session) => session.result_sheet(),
            Calculator::Cgpa(session) => session.result_sheet(),
        };
        if let Some(sheet) = sheet {
            print_rows(&sheet);
        }
    }
}

fn display_code(code: &str) -> &str {
    if code.trim().is_empty() {
        "(no code)"
    } else {
        code
    }
}

fn row_id<R: Record>(collection: &EditableCollection<R>, row: usize) -> Result<RecordId, String> {
    row.checked_sub(1)
        .and_then(|index| collection.id_at(index))
        .ok_or_else(|| format!("✗ No {} at row {row}", R::KIND))
}

fn notice_text(notice: unigrade::core::Notice) -> String {
    format!("✗ {}: {notice}", notice.title())
}

/// Run the interactive shell on stdin/stdout
pub fn run(cgpa: bool, mode: CgpaMode, config: &Config) {
    let mut shell = Shell::new(cgpa, mode, config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "UniGrade {} shell. Type 'help' for commands.",
        if cgpa { "CGPA" } else { "GPA" }
    );
    loop {
        print!("{}", shell.prompt());
        if io::stdout().flush().is_err() {
            break;
        }

        let Some(Ok(line)) = lines.next() else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("✗ {message}");
                continue;
            }
        };
        let shows_result = matches!(command, ShellCommand::Calculate | ShellCommand::Show);

        match shell.execute(command, config) {
            Ok(Step::Quit) => break,
            Ok(Step::Continue(text)) => {
                println!("{text}");
                if shows_result {
                    shell.print_result();
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }
}

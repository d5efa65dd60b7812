//! Per-picture decision state machine
//!
//! ```text
//! AutoCheck ──(remembered date)──────────────────────────────► Done
//!     │
//!     ├─(no folder yet)──► PromptDestination ──(y + label)──► PromptMove ──► Done
//!     │                          └──(n/s/q)──────────────────────────────► Done
//!     └─(folder exists)──────────────────────────────────────► PromptMove ──► Done
//! ```
//!
//! The viewer is shown only when a prompt is needed and is closed as soon
//! as the picture's decision ends, including on quit or error.

use crate::config::DATE_FORMAT;
use crate::error::{Error, Result};
use crate::library::{LibraryFolder, destination_in, is_valid_label};
use crate::mover::move_file;
use crate::prompt::{LegendEntry, Prompter};
use crate::session::{Remembered, SessionMemory};
use crate::time::ImageFile;
use crate::viewer::Viewer;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How the decision for one picture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Picture moved to `destination`
    Moved { destination: PathBuf },
    /// Picture left in place for this time only
    Left,
    /// Picture left in place because its date is skipped
    SkippedDate,
    /// The user quit; no later picture may be touched
    Cancelled,
}

/// Answer to "create a folder for this date?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateResponse {
    Create,
    No,
    SkipDate,
    Quit,
}

impl CreateResponse {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "y" => Some(Self::Create),
            "n" => Some(Self::No),
            "s" => Some(Self::SkipDate),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Answer to "move this picture into that folder?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResponse {
    Move,
    MoveAll,
    No,
    SkipDate,
    Quit,
}

impl MoveResponse {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "y" => Some(Self::Move),
            "a" => Some(Self::MoveAll),
            "n" => Some(Self::No),
            "s" => Some(Self::SkipDate),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub const CREATE_LEGEND: &[LegendEntry] = &[
    ("y", "Create folder"),
    ("n", "Do not move file"),
    ("s", "Skip all with this date"),
    ("q", "Quit and cancel later files"),
    ("?", "Print help"),
];

pub const MOVE_LEGEND: &[LegendEntry] = &[
    ("y", "Move file"),
    ("n", "Do not move file"),
    ("a", "Move all with this date"),
    ("s", "Skip all with this date"),
    ("q", "Quit and cancel later files"),
    ("?", "Print help"),
];

const LABEL_QUESTION: &str = "Enter folder name (date will be prefixed automatically)";

enum State {
    PromptDestination,
    PromptMove(LibraryFolder),
    Done(Outcome),
}

/// Decides, picture by picture, whether and where to move
///
/// Owns the session memory so date-wide answers carry over to later
/// pictures of the same run.
pub struct DecisionEngine<P, V> {
    prompter: P,
    viewer: V,
    library: PathBuf,
    sub_dir: String,
    session: SessionMemory,
}

impl<P: Prompter, V: Viewer> DecisionEngine<P, V> {
    pub fn new(
        prompter: P,
        viewer: V,
        library: impl Into<PathBuf>,
        sub_dir: impl Into<String>,
    ) -> Self {
        Self {
            prompter,
            viewer,
            library: library.into(),
            sub_dir: sub_dir.into(),
            session: SessionMemory::new(),
        }
    }

    pub fn session(&self) -> &SessionMemory {
        &self.session
    }

    /// Decide about `image`, given the library folder already holding its
    /// date if there is one
    pub fn decide(
        &mut self,
        image: &ImageFile,
        existing: Option<LibraryFolder>,
    ) -> Result<Outcome> {
        if let Some(outcome) = self.auto_check(image)? {
            return Ok(outcome);
        }

        let _viewer = self.viewer.session(&image.path);

        let mut state = match existing {
            Some(folder) => State::PromptMove(folder),
            None => State::PromptDestination,
        };

        loop {
            state = match state {
                State::PromptDestination => self.prompt_destination(image)?,
                State::PromptMove(folder) => self.prompt_move(image, folder)?,
                State::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn auto_check(&self, image: &ImageFile) -> Result<Option<Outcome>> {
        match self.session.lookup(image.date) {
            Some(Remembered::Skip) => {
                info!("{} skipped", image.path.display());
                Ok(Some(Outcome::SkippedDate))
            }
            Some(Remembered::AutoMove(folder)) => self.move_into(image, folder).map(Some),
            None => Ok(None),
        }
    }

    fn prompt_destination(&mut self, image: &ImageFile) -> Result<State> {
        let question = format!(
            "Do you want to create a folder for {} [y,n,s,q,?] ?",
            image.date.format(DATE_FORMAT)
        );

        loop {
            let answer = self.prompter.ask(&question)?;
            let state = match CreateResponse::parse(&answer) {
                Some(CreateResponse::Create) => {
                    let label = self.ask_label()?;
                    State::PromptMove(LibraryFolder::named(&self.library, image.date, &label))
                }
                Some(CreateResponse::No) => {
                    info!("{} skipped", image.path.display());
                    State::Done(Outcome::Left)
                }
                Some(CreateResponse::SkipDate) => {
                    info!("{} skipped", image.path.display());
                    self.session.skip(image.date);
                    State::Done(Outcome::SkippedDate)
                }
                Some(CreateResponse::Quit) => State::Done(Outcome::Cancelled),
                None => {
                    self.prompter.help(CREATE_LEGEND);
                    continue;
                }
            };
            return Ok(state);
        }
    }

    fn ask_label(&mut self) -> Result<String> {
        loop {
            let label = self.prompter.ask(LABEL_QUESTION)?;
            if is_valid_label(&label) {
                return Ok(label);
            }
            warn!("Folder name {:?} must not contain path separators", label.trim());
        }
    }

    fn prompt_move(&mut self, image: &ImageFile, folder: LibraryFolder) -> Result<State> {
        let question = format!(
            "Do you want to move \"{}\" into \"{}\" [y,n,a,s,q,?] ?",
            image.path.display(),
            folder.path.display()
        );

        loop {
            let answer = self.prompter.ask(&question)?;
            let outcome = match MoveResponse::parse(&answer) {
                Some(MoveResponse::Move) => self.move_into(image, &folder.path)?,
                Some(MoveResponse::MoveAll) => {
                    self.session.auto_move(image.date, folder.path.clone());
                    self.move_into(image, &folder.path)?
                }
                Some(MoveResponse::No) => {
                    info!("{} skipped", image.path.display());
                    Outcome::Left
                }
                Some(MoveResponse::SkipDate) => {
                    info!("{} skipped", image.path.display());
                    self.session.skip(image.date);
                    Outcome::SkippedDate
                }
                Some(MoveResponse::Quit) => Outcome::Cancelled,
                None => {
                    self.prompter.help(MOVE_LEGEND);
                    continue;
                }
            };
            return Ok(State::Done(outcome));
        }
    }

    fn move_into(&self, image: &ImageFile, folder: &Path) -> Result<Outcome> {
        let destination = destination_in(folder, &image.path, &self.sub_dir)
            .ok_or_else(|| Error::Config("Invalid source filename".into()))?;
        move_file(&image.path, &destination)?;
        Ok(Outcome::Moved { destination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::tests::ScriptedPrompter;
    use crate::time::DateSource;
    use crate::viewer::tests::CountingViewer;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    type TestEngine = DecisionEngine<ScriptedPrompter, CountingViewer>;

    struct Fixture {
        _tmp: TempDir,
        input: PathBuf,
        library: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let input = tmp.path().join("input");
            let library = tmp.path().join("library");
            fs::create_dir(&input).unwrap();
            fs::create_dir(&library).unwrap();
            Self {
                _tmp: tmp,
                input,
                library,
            }
        }

        fn image(&self, name: &str, date: NaiveDate) -> ImageFile {
            let path = self.input.join(name);
            fs::write(&path, name.as_bytes()).unwrap();
            ImageFile {
                path,
                date,
                source: DateSource::Filename,
            }
        }

        fn folder(&self, name: &str, date: NaiveDate) -> LibraryFolder {
            let path = self.library.join(name);
            fs::create_dir_all(&path).unwrap();
            LibraryFolder { path, date }
        }

        fn engine(
            &self,
            answers: &[&str],
            sub_dir: &str,
        ) -> (TestEngine, ScriptedPrompter, CountingViewer) {
            let prompter = ScriptedPrompter::new(answers);
            let viewer = CountingViewer::default();
            let engine =
                DecisionEngine::new(prompter.clone(), viewer.clone(), &self.library, sub_dir);
            (engine, prompter, viewer)
        }
    }

    fn jan31() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 31).unwrap()
    }

    #[test]
    fn test_parse_responses() {
        assert_eq!(CreateResponse::parse("y"), Some(CreateResponse::Create));
        assert_eq!(CreateResponse::parse(" s\n"), Some(CreateResponse::SkipDate));
        assert_eq!(CreateResponse::parse("a"), None);
        assert_eq!(CreateResponse::parse("?"), None);
        assert_eq!(MoveResponse::parse("a"), Some(MoveResponse::MoveAll));
        assert_eq!(MoveResponse::parse("q"), Some(MoveResponse::Quit));
        assert_eq!(MoveResponse::parse("Y"), None);
        assert_eq!(MoveResponse::parse(""), None);
    }

    #[test]
    fn test_move_into_existing_folder() {
        let fx = Fixture::new();
        let image = fx.image("IMG_20220131_120000.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        let (mut engine, prompter, viewer) = fx.engine(&["y"], "");

        let outcome = engine.decide(&image, Some(folder.clone())).unwrap();

        let expected = folder.path.join("IMG_20220131_120000.jpg");
        assert_eq!(outcome, Outcome::Moved { destination: expected.clone() });
        assert!(expected.is_file());
        assert!(!image.path.exists());
        assert_eq!(prompter.asked(), 1);
        assert_eq!(viewer.opened.get(), 1);
        assert_eq!(viewer.open_now.get(), 0);
    }

    #[test]
    fn test_move_respects_sub_dir() {
        let fx = Fixture::new();
        let image = fx.image("IMG_20220131_120000.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        let (mut engine, _, _) = fx.engine(&["y"], "Phone");

        engine.decide(&image, Some(folder.clone())).unwrap();
        assert!(folder.path.join("Phone").join("IMG_20220131_120000.jpg").is_file());
    }

    #[test]
    fn test_create_folder_then_move() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, prompter, _) = fx.engine(&["y", "  Ski Trip ", "y"], "");

        let outcome = engine.decide(&image, None).unwrap();

        let expected = fx.library.join("2022-01-31 Ski Trip").join("a.jpg");
        assert_eq!(outcome, Outcome::Moved { destination: expected.clone() });
        assert!(expected.is_file());
        assert_eq!(prompter.asked(), 3);
        assert!(prompter.questions.borrow()[0].contains("2022-01-31"));
    }

    #[test]
    fn test_create_then_decline_leaves_library_untouched() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, _, _) = fx.engine(&["y", "Ski Trip", "n"], "");

        assert_eq!(engine.decide(&image, None).unwrap(), Outcome::Left);
        assert!(image.path.exists());
        assert!(!fx.library.join("2022-01-31 Ski Trip").exists());
    }

    #[test]
    fn test_label_with_separator_is_asked_again() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, prompter, _) =
            fx.engine(&["y", "x/../../..", "a/b", "Ski\\Trip", "Ski", "y"], "");

        let outcome = engine.decide(&image, None).unwrap();

        let expected = fx.library.join("2022-01-31 Ski").join("a.jpg");
        assert_eq!(outcome, Outcome::Moved { destination: expected.clone() });
        assert!(expected.is_file());
        assert_eq!(prompter.asked(), 6);
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(fs::read_dir(&fx.library).unwrap().count(), 1);
    }

    #[test]
    fn test_decline_create() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, _, viewer) = fx.engine(&["n"], "");

        assert_eq!(engine.decide(&image, None).unwrap(), Outcome::Left);
        assert!(image.path.exists());
        assert_eq!(engine.session().lookup(jan31()), None);
        assert_eq!(viewer.open_now.get(), 0);
    }

    #[test]
    fn test_skip_date_at_create_prompt() {
        let fx = Fixture::new();
        let first = fx.image("a.jpg", jan31());
        let second = fx.image("b.jpg", jan31());
        let (mut engine, prompter, viewer) = fx.engine(&["s"], "");

        assert_eq!(engine.decide(&first, None).unwrap(), Outcome::SkippedDate);
        assert_eq!(engine.decide(&second, None).unwrap(), Outcome::SkippedDate);

        assert_eq!(prompter.asked(), 1);
        assert_eq!(viewer.opened.get(), 1);
        assert!(first.path.exists() && second.path.exists());
    }

    #[test]
    fn test_skip_date_at_move_prompt() {
        let fx = Fixture::new();
        let first = fx.image("a.jpg", jan31());
        let second = fx.image("b.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        let (mut engine, prompter, _) = fx.engine(&["s"], "");

        assert_eq!(engine.decide(&first, Some(folder.clone())).unwrap(), Outcome::SkippedDate);
        assert_eq!(engine.decide(&second, Some(folder)).unwrap(), Outcome::SkippedDate);
        assert_eq!(prompter.asked(), 1);
        assert!(second.path.exists());
    }

    #[test]
    fn test_move_all_with_date() {
        let fx = Fixture::new();
        let first = fx.image("a.jpg", jan31());
        let second = fx.image("b.jpg", jan31());
        let other = fx.image("c.jpg", NaiveDate::from_ymd_opt(2022, 2, 1).unwrap());
        let (mut engine, prompter, viewer) = fx.engine(&["y", "Ski Trip", "a", "n"], "Raw");

        engine.decide(&first, None).unwrap();
        // Second picture goes to the chosen folder even without a match passed in
        let outcome = engine.decide(&second, None).unwrap();
        let expected = fx.library.join("2022-01-31 Ski Trip").join("Raw").join("b.jpg");
        assert_eq!(outcome, Outcome::Moved { destination: expected.clone() });
        assert!(expected.is_file());
        assert_eq!(prompter.asked(), 3);
        assert_eq!(viewer.opened.get(), 1);

        // A different date is still asked about
        assert_eq!(engine.decide(&other, None).unwrap(), Outcome::Left);
        assert_eq!(prompter.asked(), 4);
    }

    #[test]
    fn test_quit_closes_viewer() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        let (mut engine, _, viewer) = fx.engine(&["q"], "");

        assert_eq!(engine.decide(&image, Some(folder)).unwrap(), Outcome::Cancelled);
        assert!(image.path.exists());
        assert_eq!(viewer.opened.get(), 1);
        assert_eq!(viewer.open_now.get(), 0);
    }

    #[test]
    fn test_quit_at_create_prompt() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, _, _) = fx.engine(&["q"], "");

        assert_eq!(engine.decide(&image, None).unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn test_invalid_answers_reprompt() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        let (mut engine, prompter, viewer) = fx.engine(&["?", "maybe", "help", "y"], "");

        let outcome = engine.decide(&image, Some(folder)).unwrap();
        assert!(matches!(outcome, Outcome::Moved { .. }));
        assert_eq!(prompter.asked(), 4);
        assert_eq!(*prompter.helps.borrow(), 3);
        assert_eq!(viewer.opened.get(), 1);
    }

    #[test]
    fn test_many_invalid_answers_do_not_grow_stack() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let mut answers = vec!["x"; 10_000];
        answers.push("n");
        let (mut engine, _, _) = fx.engine(&answers, "");

        assert_eq!(engine.decide(&image, None).unwrap(), Outcome::Left);
    }

    #[test]
    fn test_prompt_error_closes_viewer() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let (mut engine, _, viewer) = fx.engine(&[], "");

        assert!(matches!(engine.decide(&image, None), Err(Error::Prompt(_))));
        assert_eq!(viewer.opened.get(), 1);
        assert_eq!(viewer.open_now.get(), 0);
    }

    #[test]
    fn test_existing_destination_is_reported() {
        let fx = Fixture::new();
        let image = fx.image("a.jpg", jan31());
        let folder = fx.folder("2022-01-31 Ski Trip", jan31());
        fs::write(folder.path.join("a.jpg"), b"already here").unwrap();
        let (mut engine, _, viewer) = fx.engine(&["y"], "");

        let result = engine.decide(&image, Some(folder));
        assert!(matches!(result, Err(Error::DestinationExists { .. })));
        assert!(image.path.exists());
        assert_eq!(viewer.open_now.get(), 0);
    }
}

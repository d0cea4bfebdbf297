use crate::core::console::Console;
use crate::core::library::Library;
use crate::domain::model::{BookId, MemberId, SortKey};
use crate::domain::ports::Repository;
use crate::utils::error::{LibraryError, Result};
use std::io::{BufRead, Write};

pub const DEFAULT_TITLE: &str = "City Library Digital Management System";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    AddBook,
    AddMember,
    IssueBook,
    ReturnBook,
    Search,
    Sort,
    Exit,
}

impl MenuCommand {
    pub fn from_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::AddBook),
            2 => Some(Self::AddMember),
            3 => Some(Self::IssueBook),
            4 => Some(Self::ReturnBook),
            5 => Some(Self::Search),
            6 => Some(Self::Sort),
            7 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Whether mutations are still written through to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Enabled,
    /// A load or save failed; the rest of the run stays in memory.
    MemoryOnly,
}

/// The interactive menu loop. Owns the library state, the repository and the console.
#[derive(Debug)]
pub struct Session<P, R, W> {
    library: Library,
    repository: P,
    persistence: Persistence,
    console: Console<R, W>,
    state: SessionState,
    title: String,
}

impl<P: Repository, R: BufRead, W: Write> Session<P, R, W> {
    /// Loads the library from `repository`. A failed load is reported on the
    /// console and the session continues empty and in memory only.
    pub fn start(repository: P, input: R, output: W, title: impl Into<String>) -> Result<Self> {
        let mut console = Console::new(input, output);

        let (library, persistence) = match repository.load().and_then(Library::from_snapshot) {
            Ok(library) => {
                for problem in library.consistency_report() {
                    tracing::warn!("Inconsistent data: {}", problem);
                }
                let categories: Vec<&str> = library.catalog.categories().collect();
                tracing::info!("Catalog categories: {}", categories.join(", "));
                (library, Persistence::Enabled)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to load library data: {} (Category: {:?})",
                    e,
                    e.category()
                );
                console.say(format!("Error loading files. {}", e.user_friendly_message()))?;
                console.say(e.recovery_suggestion())?;
                (Library::new(), Persistence::MemoryOnly)
            }
        };

        Ok(Self {
            library,
            repository,
            persistence,
            console,
            state: SessionState::Running,
            title: title.into(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        while self.state == SessionState::Running {
            self.step()?;
        }
        Ok(())
    }

    /// Shows the menu and handles one choice.
    pub fn step(&mut self) -> Result<()> {
        self.print_menu()?;
        let Some(choice) = self.console.prompt_number::<u32>("Enter choice: ")? else {
            return self.exit();
        };

        match MenuCommand::from_choice(choice) {
            Some(command) => {
                tracing::debug!("Menu command {:?}", command);
                self.dispatch(command)
            }
            None => self.console.say("Invalid choice."),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn persistence(&self) -> Persistence {
        self.persistence
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn console_output(&self) -> &W {
        self.console.output()
    }

    fn dispatch(&mut self, command: MenuCommand) -> Result<()> {
        match command {
            MenuCommand::AddBook => self.add_book(),
            MenuCommand::AddMember => self.add_member(),
            MenuCommand::IssueBook => self.issue_book(),
            MenuCommand::ReturnBook => self.return_book(),
            MenuCommand::Search => self.search_books(),
            MenuCommand::Sort => self.sort_books(),
            MenuCommand::Exit => self.exit(),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let menu = format!(
            "\n===== {} =====\n\
             1. Add Book\n\
             2. Add Member\n\
             3. Issue Book\n\
             4. Return Book\n\
             5. Search Books\n\
             6. Sort Books\n\
             7. Exit",
            self.title
        );
        self.console.say(menu)
    }

    fn add_book(&mut self) -> Result<()> {
        let Some(title) = self.console.prompt_text("Enter Book Title: ", "Title")? else {
            return self.exit();
        };
        let Some(author) = self.console.prompt_text("Enter Author: ", "Author")? else {
            return self.exit();
        };
        let Some(category) = self.console.prompt_text("Enter Category: ", "Category")? else {
            return self.exit();
        };

        let id = match self.library.catalog.add_book(title, author, category) {
            Ok(id) => id,
            Err(e) => return self.report(&e),
        };
        self.persist()?;
        self.console
            .say(format!("Book added successfully with ID: {}", id))
    }

    fn add_member(&mut self) -> Result<()> {
        let Some(name) = self.console.prompt_text("Enter Member Name: ", "Name")? else {
            return self.exit();
        };
        let Some(email) = self.console.prompt_text("Enter Email: ", "Email")? else {
            return self.exit();
        };

        let id = match self.library.membership.add_member(name, email) {
            Ok(id) => id,
            Err(e) => return self.report(&e),
        };
        self.persist()?;
        self.console
            .say(format!("Member added successfully with ID: {}", id))
    }

    fn issue_book(&mut self) -> Result<()> {
        let Some((book_id, member_id)) = self.prompt_ids()? else {
            return self.exit();
        };

        match self.library.issue_book(book_id, member_id) {
            Ok(()) => {
                self.persist()?;
                self.console.say("Book issued successfully.")
            }
            Err(e) => self.report(&e),
        }
    }

    fn return_book(&mut self) -> Result<()> {
        let Some((book_id, member_id)) = self.prompt_ids()? else {
            return self.exit();
        };

        match self.library.return_book(book_id, member_id) {
            Ok(()) => {
                self.persist()?;
                self.console.say("Book returned successfully.")
            }
            Err(e) => self.report(&e),
        }
    }

    fn search_books(&mut self) -> Result<()> {
        let Some(keyword) = self
            .console
            .prompt_line("Search by (title/author/category): ")?
        else {
            return self.exit();
        };

        let matches: Vec<String> = self
            .library
            .catalog
            .search(&keyword)
            .map(|book| book.to_string())
            .collect();

        if matches.is_empty() {
            return self
                .console
                .say(format!("No books matched '{}'.", keyword.trim()));
        }
        for details in matches {
            self.console.say(format!("\n{}", details))?;
        }
        Ok(())
    }

    fn sort_books(&mut self) -> Result<()> {
        self.console.say("\nSort by: 1) Title  2) Author")?;
        let Some(choice) = self.console.prompt_number::<u32>("Enter choice: ")? else {
            return self.exit();
        };

        let catalog = &self.library.catalog;
        let listing: Vec<String> = match SortKey::from_choice(choice) {
            Some(key) => catalog.sorted_view(key).iter().map(|b| b.to_string()).collect(),
            None => catalog.iter().map(|b| b.to_string()).collect(),
        };

        if listing.is_empty() {
            return self.console.say("The catalog is empty.");
        }
        for details in listing {
            self.console.say(format!("\n{}", details))?;
        }
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        self.persist()?;
        self.state = SessionState::Terminated;
        tracing::info!("Session terminated");
        self.console.say("Exiting...")
    }

    fn prompt_ids(&mut self) -> Result<Option<(BookId, MemberId)>> {
        let Some(book_id) = self.console.prompt_number::<BookId>("Enter Book ID: ")? else {
            return Ok(None);
        };
        let Some(member_id) = self
            .console
            .prompt_number::<MemberId>("Enter Member ID: ")?
        else {
            return Ok(None);
        };
        Ok(Some((book_id, member_id)))
    }

    /// Writes the library through the repository unless the session is memory only.
    fn persist(&mut self) -> Result<()> {
        if self.persistence == Persistence::MemoryOnly {
            tracing::debug!("Skipping save, session is memory only");
            return Ok(());
        }

        if let Err(e) = self
            .repository
            .save(&self.library.catalog, &self.library.membership)
        {
            tracing::error!(
                "Failed to save library data: {} (Category: {:?})",
                e,
                e.category()
            );
            self.persistence = Persistence::MemoryOnly;
            self.console
                .say(format!("Error saving data. {}", e.user_friendly_message()))?;
            self.console.say(e.recovery_suggestion())?;
        }
        Ok(())
    }

    fn report(&mut self, error: &LibraryError) -> Result<()> {
        tracing::debug!("Command rejected: {}", error);
        self.console.say(error.user_friendly_message())
    }
}

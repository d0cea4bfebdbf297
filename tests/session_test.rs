use anyhow::Result;
use city_library::core::session::{Persistence, SessionState, DEFAULT_TITLE};
use city_library::domain::model::{BookId, MemberId};
use city_library::{FlatFileRepository, Session};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn repository_in(dir: &TempDir) -> FlatFileRepository {
    FlatFileRepository::new(dir.path().join("books.txt"), dir.path().join("members.txt"))
}

/// Runs `script` as console input and returns the session plus everything it printed.
fn run_session<'a>(
    repository: &'a FlatFileRepository,
    script: &str,
) -> Result<(Session<&'a FlatFileRepository, Cursor<Vec<u8>>, Vec<u8>>, String)> {
    let input = Cursor::new(script.as_bytes().to_vec());
    let mut session = Session::start(repository, input, Vec::new(), DEFAULT_TITLE)?;
    session.run()?;
    let output = String::from_utf8(session.console_output().clone())?;
    Ok((session, output))
}

#[test]
fn test_issue_and_return_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);
    let script = "\
1\nDune\nHerbert\nSciFi\n\
2\nAlice\na@x.com\n\
3\n100\n1000\n\
3\n100\n1000\n\
4\n100\n1000\n\
4\n100\n1000\n\
7\n";

    let (session, output) = run_session(&repository, script)?;

    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.persistence(), Persistence::Enabled);
    assert!(output.contains("===== City Library Digital Management System ====="));
    assert!(output.contains("Book added successfully with ID: 100"));
    assert!(output.contains("Member added successfully with ID: 1000"));
    assert_eq!(output.matches("Book issued successfully.").count(), 1);
    assert_eq!(output.matches("Book already issued.").count(), 1);
    assert_eq!(output.matches("Book returned successfully.").count(), 1);
    assert_eq!(output.matches("Book is not issued.").count(), 1);

    assert_eq!(
        fs::read_to_string(repository.books_path())?,
        "100,Dune,Herbert,SciFi,false\n"
    );
    assert_eq!(
        fs::read_to_string(repository.members_path())?,
        "1000,Alice,a@x.com,\n"
    );
    Ok(())
}

#[test]
fn test_state_survives_restart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);

    run_session(
        &repository,
        "1\nThe Hobbit\nJ.R.R. Tolkien\nFantasy\n2\nBob\nb@x.com\n3\n100\n1000\n7\n",
    )?;
    let (session, output) = run_session(&repository, "1\nDune\nHerbert\nSciFi\n7\n")?;

    assert!(output.contains("Book added successfully with ID: 101"));
    let library = session.library();
    assert!(library.catalog.find_book(BookId(100)).unwrap().issued);
    assert_eq!(library.membership.holder_of(BookId(100)), Some(MemberId(1000)));
    assert_eq!(library.catalog.len(), 2);
    Ok(())
}

#[test]
fn test_search_and_sort_listings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);
    fs::write(
        repository.books_path(),
        "100,Zebra,Moss,Nature,false\n101,Apple,Kay,Food,false\n102,mango,Able,Food,false\n",
    )?;

    let (_session, output) = run_session(&repository, "5\nFOOD\n5\nnothing here\n6\n1\n6\n2\n7\n")?;

    assert!(output.contains("Search by (title/author/category): "));
    assert!(output.contains("No books matched 'nothing here'."));

    let sections: Vec<&str> = output.split("Sort by: 1) Title  2) Author").collect();
    assert_eq!(sections.len(), 3);

    let search = sections[0];
    assert!(search.find("Title   : Apple") < search.find("Title   : mango"));
    assert!(!search.contains("Title   : Zebra"));

    let by_title = sections[1];
    let apple = by_title.find("Title   : Apple").unwrap();
    let mango = by_title.find("Title   : mango").unwrap();
    let zebra = by_title.find("Title   : Zebra").unwrap();
    assert!(apple < mango && mango < zebra);

    let by_author = sections[2];
    let able = by_author.find("Author  : Able").unwrap();
    let kay = by_author.find("Author  : Kay").unwrap();
    let moss = by_author.find("Author  : Moss").unwrap();
    assert!(able < kay && kay < moss);
    Ok(())
}

#[test]
fn test_unknown_sort_key_lists_catalog_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);
    fs::write(
        repository.books_path(),
        "100,Zebra,Moss,Nature,false\n101,Apple,Kay,Food,false\n",
    )?;

    let (_session, output) = run_session(&repository, "6\n9\n7\n")?;

    let zebra = output.find("Title   : Zebra").unwrap();
    let apple = output.find("Title   : Apple").unwrap();
    assert!(zebra < apple);
    Ok(())
}

#[test]
fn test_malformed_data_file_keeps_session_in_memory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);
    fs::write(repository.books_path(), "not,a,book\n")?;

    let (session, output) = run_session(&repository, "1\nDune\nHerbert\nSciFi\n7\n")?;

    assert_eq!(session.persistence(), Persistence::MemoryOnly);
    assert!(output.contains("Error loading files."));
    assert!(output.contains("Book added successfully with ID: 100"));
    // the unreadable file is left alone
    assert_eq!(fs::read_to_string(repository.books_path())?, "not,a,book\n");
    assert!(!repository.members_path().exists());
    Ok(())
}

#[test]
fn test_bad_numbers_are_reprompted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = repository_in(&temp_dir);

    let (session, output) =
        run_session(&repository, "one\n1\nDune\nHerbert\nSciFi\n3\nx100\n100\n1000\n7\n")?;

    assert_eq!(session.state(), SessionState::Terminated);
    assert!(output.contains("'one' is not a valid number"));
    assert!(output.contains("'x100' is not a valid number"));
    assert!(output.contains("Member not found."));
    Ok(())
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the site and run the full
//! listing -> person -> book cycle end-to-end.

use goodbooks_crawler::catalog::Person;
use goodbooks_crawler::config::Config;
use goodbooks_crawler::crawler::{crawl, CrawlRun};
use goodbooks_crawler::output::{read_catalog, FailureKind, JsonOutput};
use goodbooks_crawler::state::PageKind;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A book card on a person page: (slug, title, authors, cover path)
type Card<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, dir: &Path, with_cache: bool) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = format!("{}/people/", server.uri());
    config.crawler.allowed_domains = vec!["127.0.0.1".to_string()];
    config.crawler.request_timeout_secs = 5;
    config.output.people_path = dir.join("people.json").display().to_string();
    config.output.books_path = dir.join("books.json").display().to_string();
    config.output.photos_dir = dir.join("photos").display().to_string();
    config.output.covers_dir = dir.join("covers").display().to_string();
    config.output.cache_path = if with_cache {
        dir.join("cache.db").display().to_string()
    } else {
        String::new()
    };
    config
}

fn listing_page(people: &[&str]) -> String {
    let links: String = people
        .iter()
        .map(|href| {
            format!(
                r#"<a class="people-wrap people-wrap-sidebar w-inline-block" href="{}">x</a>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><body><a href="/about">About</a>{}</body></html>"#,
        links
    )
}

fn person_page(name: &str, photo: &str, cards: &[Card]) -> String {
    let books: String = cards
        .iter()
        .map(|(slug, title, authors, cover)| {
            format!(
                r#"<div class="book-wrap"><a href="/books/{}"><h5>{}</h5></a><h6>{}</h6><img class="book-cover" src="{}"></div>"#,
                slug, title, authors, cover
            )
        })
        .collect();
    format!(
        r#"<html><body>
            <h1 class="h1">books recommended by {}</h1>
            <img class="people-photo" src="{}">
            <a class="badge badge-large w-inline-block" href="/industries/tech">Engineer</a>
            <a class="badge badge-large w-inline-block" href="/industries/finance">Banker</a>
            {}
        </body></html>"#,
        name, photo, books
    )
}

fn book_page(description: &str, genres: &[&str]) -> String {
    let badges: String = genres
        .iter()
        .map(|g| format!(r#"<div class="badge-text">{}</div>"#, g))
        .collect();
    format!(
        r#"<html><body><div class="right-side"><p>{}</p>{}</div></body></html>"#,
        description, badges
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, at: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_images(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"IMG".to_vec()))
        .mount(server)
        .await;
}

/// Two people sharing one book, each book page serving details
async fn mount_site(server: &MockServer, times: u64) {
    mount_page(
        server,
        "/people/",
        listing_page(&["/people/jane", "/people/john"]),
        times,
    )
    .await;
    mount_page(
        server,
        "/people/jane",
        person_page(
            "Jane Doe",
            "/img/p/jane.jpg",
            &[
                ("dune", "Dune", "Frank Herbert", "/img/c/dune.jpg"),
                (
                    "good-omens",
                    "Good Omens",
                    "Terry Pratchett &amp; Neil Gaiman",
                    "/img/c/good-omens.jpg",
                ),
            ],
        ),
        times,
    )
    .await;
    mount_page(
        server,
        "/people/john",
        person_page(
            "John Smith",
            "/img/p/john.jpg",
            &[("dune", "Dune", "Frank Herbert", "/img/c/dune.jpg")],
        ),
        times,
    )
    .await;
    mount_page(
        server,
        "/books/dune",
        book_page("A desert planet.", &["Science Fiction", "Classics"]),
        times,
    )
    .await;
    mount_page(
        server,
        "/books/good-omens",
        book_page("The end is nigh.", &["Fantasy"]),
        times,
    )
    .await;
    mount_images(server).await;
}

fn person<'a>(run: &'a CrawlRun, name: &str) -> &'a Person {
    run.catalog
        .people()
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("{} missing from catalog", name))
}

#[tokio::test]
async fn test_full_crawl_dedups_shared_book() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server, 1).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    assert_eq!(run.catalog.people().len(), 2);
    assert_eq!(run.catalog.books().len(), 2);
    assert_eq!(person(&run, "Jane Doe").book_slugs, vec!["dune", "good-omens"]);
    assert_eq!(person(&run, "John Smith").book_slugs, vec!["dune"]);

    assert_eq!(run.report.pages_fetched_of(PageKind::Listing), 1);
    assert_eq!(run.report.pages_fetched_of(PageKind::Person), 2);
    assert_eq!(run.report.pages_fetched_of(PageKind::Book), 2);
    assert!(run.report.failures.is_empty(), "{:?}", run.report.failures);

    // Each book page was mounted with expect(1)
    server.verify().await;
}

#[tokio::test]
async fn test_book_details_enrich_registered_books() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server, 1).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    let dune = run.catalog.books().get("dune").unwrap();
    assert_eq!(dune.title, "Dune");
    assert_eq!(dune.authors, vec!["Frank Herbert"]);
    assert_eq!(dune.description, "A desert planet.");
    assert_eq!(dune.genres, vec!["Science Fiction", "Classics"]);

    let omens = run.catalog.books().get("good-omens").unwrap();
    assert_eq!(omens.authors, vec!["Terry Pratchett", "Neil Gaiman"]);
    assert_eq!(omens.genres, vec!["Fantasy"]);
    assert_eq!(run.report.books_enriched, 2);
}

#[tokio::test]
async fn test_people_industries_and_images() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server, 1).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    let jane = person(&run, "Jane Doe");
    assert_eq!(jane.industries, vec!["tech", "finance"]);
    assert_eq!(jane.occupations, vec!["Engineer", "Banker"]);

    let portrait = dir.path().join("photos").join("jane.jpg");
    assert_eq!(jane.image_path, portrait.display().to_string());
    assert_eq!(std::fs::read(&portrait).unwrap(), b"IMG");

    let cover = dir.path().join("covers").join("dune.jpg");
    assert_eq!(
        run.catalog.books().get("dune").unwrap().image_path,
        cover.display().to_string()
    );
    assert!(cover.is_file());

    // Two portraits and two covers
    assert_eq!(run.report.images_saved, 4);
}

#[tokio::test]
async fn test_page_without_prefix_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/people/",
        listing_page(&["/people/jane", "/people/press"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/people/jane",
        person_page("Jane Doe", "/img/p/jane.jpg", &[]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/people/press",
        "<html><body><h1 class=\"h1\">Press coverage</h1></body></html>".to_string(),
        1,
    )
    .await;
    mount_images(&server).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    assert_eq!(run.catalog.people().len(), 1);
    assert_eq!(run.report.pages_skipped, 1);
    assert!(run.report.failures.is_empty());
}

#[tokio::test]
async fn test_failures_are_reported_not_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/people/",
        listing_page(&["/people/jane", "http://elsewhere.example.com/people/eve"]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/people/jane",
        person_page(
            "Jane Doe",
            "/img/p/missing.jpg",
            &[("lost", "Lost Book", "Nobody", "/img/c/lost.jpg")],
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/books/lost"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/p/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_images(&server).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    let lost = run.catalog.books().get("lost").unwrap();
    assert!(!lost.is_enriched());
    assert_eq!(person(&run, "Jane Doe").book_slugs, vec!["lost"]);

    let report = &run.report;
    assert_eq!(report.failures_of(&FailureKind::HttpStatus(404)).count(), 1);
    assert_eq!(report.failures_of(&FailureKind::DomainNotAllowed).count(), 1);
    assert_eq!(report.failures_of(&FailureKind::Image).count(), 1);
    assert_eq!(report.failures.len(), 3);
}

#[tokio::test]
async fn test_cover_collision_first_write_wins() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/people/", listing_page(&["/people/jane"]), 1).await;
    mount_page(
        &server,
        "/people/jane",
        person_page(
            "Jane Doe",
            "/img/p/jane.jpg",
            &[
                ("first", "First", "A", "/img/a/cover.jpg"),
                ("second", "Second", "B", "/img/b/cover.jpg"),
            ],
        ),
        1,
    )
    .await;
    mount_page(&server, "/books/first", book_page("One.", &[]), 1).await;
    mount_page(&server, "/books/second", book_page("Two.", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/img/a/cover.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"FIRST".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/b/cover.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"SECOND".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    mount_images(&server).await;

    let run = crawl(create_test_config(&server, dir.path(), false))
        .await
        .unwrap();

    let first = run.catalog.books().get("first").unwrap();
    let second = run.catalog.books().get("second").unwrap();
    assert_eq!(first.image_path, second.image_path);

    let cover = dir.path().join("covers").join("cover.jpg");
    assert_eq!(std::fs::read(cover).unwrap(), b"FIRST");
    assert_eq!(
        run.report
            .failures_of(&FailureKind::ImageCollision)
            .count(),
        1
    );

    server.verify().await;
}

#[tokio::test]
async fn test_json_output_round_trip() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_site(&server, 1).await;
    let config = create_test_config(&server, dir.path(), false);

    let output = JsonOutput::create(&config.output).unwrap();
    let run = crawl(config.clone()).await.unwrap();
    output.write(&run.catalog).unwrap();

    let people_path = Path::new(&config.output.people_path);
    let books_path = Path::new(&config.output.books_path);
    let loaded = read_catalog(people_path, books_path).unwrap();
    assert_eq!(loaded, run.catalog);

    let books = std::fs::read_to_string(books_path).unwrap();
    assert!(books.starts_with("{\n  \"dune\": {"));
    assert!(books.ends_with("}\n"));

    let people = std::fs::read_to_string(people_path).unwrap();
    assert!(people.contains("\"bookSlugs\""));
    assert!(people.contains("\"imagePath\""));
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    // Pages are fetched from the network only once across both runs
    mount_site(&server, 1).await;
    let config = create_test_config(&server, dir.path(), true);

    let first = crawl(config.clone()).await.unwrap();
    assert_eq!(first.report.pages_from_cache, 0);

    let second = crawl(config).await.unwrap();
    assert_eq!(second.report.pages_from_cache, second.report.total_pages());
    assert_eq!(second.report.total_pages(), 5);
    assert_eq!(second.catalog.books(), first.catalog.books());

    server.verify().await;
}

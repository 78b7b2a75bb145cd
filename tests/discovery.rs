//! Integration tests for the discovery orchestrator.
//!
//! All HTTP traffic goes to a local listener with canned responses; nothing
//! here touches the external network. Pattern guessing runs with
//! `max_pages = 0` so no fetches happen at all on those paths.

use email_scout_core::{
    initialize_scout, Config, ConfigBuilder, DiscoveryOptions, DomainStatus, EmailScout, NoDelay,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// (path, content type, body) triples served by the local test server.
type ServedPages = Vec<(String, String, String)>;

fn page(path: &str, body: &str) -> (String, String, String) {
    (
        path.to_string(),
        "text/html; charset=utf-8".to_string(),
        body.to_string(),
    )
}

/// Serves canned pages on a random local port, counting every request.
async fn spawn_server(pages: ServedPages) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_for_server = Arc::clone(&hits);
    let pages = Arc::new(pages);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            hits_for_server.fetch_add(1, Ordering::SeqCst);
            let pages = Arc::clone(&pages);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();

                let response = match pages.iter().find(|(p, _, _)| *p == path) {
                    Some((_, content_type, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        content_type,
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), hits)
}

fn test_config() -> Config {
    ConfigBuilder::new().build().expect("default config builds")
}

async fn test_scout(config: &Config) -> EmailScout {
    initialize_scout(config)
        .await
        .expect("scout initializes")
        .with_delay_policy(Arc::new(NoDelay))
}

#[tokio::test]
async fn empty_or_invalid_input_yields_empty_report() {
    let config = test_config();
    let scout = test_scout(&config).await;
    let options = DiscoveryOptions {
        max_pages: 3,
        verify: false,
    };

    for input in ["", "   ", "http://"] {
        let report = scout
            .discover(&config, input, &[], options)
            .await
            .expect("discover never errors on bad input");
        assert!(report.addresses().is_empty(), "input {:?}", input);
        assert!(report.pages_visited.is_empty());
    }
}

#[tokio::test]
async fn scraping_collects_lowercases_and_dedups() {
    let (base, _hits) = spawn_server(vec![
        page(
            "/",
            r#"<html><body>Write to Foo@Acme.test or foo@acme.test.
               <a href="/contact">Contact us</a></body></html>"#,
        ),
        page("/contact", "Sales: SALES@acme.test"),
    ])
    .await;

    let config = test_config();
    let scout = test_scout(&config).await;
    let options = DiscoveryOptions {
        max_pages: 6,
        verify: false,
    };

    let report = scout
        .discover(&config, &base, &[], options)
        .await
        .expect("discover");
    assert_eq!(
        report.addresses(),
        vec!["foo@acme.test".to_string(), "sales@acme.test".to_string()]
    );
    assert!(report
        .methods_used
        .iter()
        .any(|m| m == "website_scraping"));

    // Idempotence: a second run against unchanged pages finds the same set.
    let again = scout
        .discover(&config, &base, &[], options)
        .await
        .expect("discover again");
    assert_eq!(report.addresses(), again.addresses());
}

#[tokio::test]
async fn crawl_budget_bounds_fetch_count() {
    let many_links: String = (0..10)
        .map(|i| format!(r#"<a href="/contact-{}">Contact {}</a>"#, i, i))
        .collect();
    let (base, hits) = spawn_server(vec![page("/", &many_links)]).await;

    let config = test_config();
    let scout = test_scout(&config).await;
    let report = scout
        .discover(
            &config,
            &base,
            &[],
            DiscoveryOptions {
                max_pages: 3,
                verify: false,
            },
        )
        .await
        .expect("discover");

    assert!(
        hits.load(Ordering::SeqCst) <= 3,
        "fetched {} pages with a budget of 3",
        hits.load(Ordering::SeqCst)
    );
    assert!(report.pages_visited.len() <= 3);
}

#[tokio::test]
async fn blacklisted_domains_never_reported() {
    let (base, _hits) = spawn_server(vec![page(
        "/",
        "contact me at foo@linkedin.com or team@facebook.com",
    )])
    .await;

    let config = test_config();
    let scout = test_scout(&config).await;
    let report = scout
        .discover(
            &config,
            &base,
            &[],
            DiscoveryOptions {
                max_pages: 2,
                verify: false,
            },
        )
        .await
        .expect("discover");

    assert!(report.addresses().is_empty());
}

#[tokio::test]
async fn binary_extension_paths_are_never_fetched() {
    let (base, hits) = spawn_server(vec![page("/contact", "info@acme.test")]).await;

    let config = ConfigBuilder::new()
        .common_pages(vec!["brochure.pdf".to_string(), "contact".to_string()])
        .build()
        .expect("config builds");
    let scout = test_scout(&config).await;

    let report = scout
        .discover(
            &config,
            &base,
            &[],
            DiscoveryOptions {
                max_pages: 2,
                verify: false,
            },
        )
        .await
        .expect("discover");

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(report.addresses(), vec!["info@acme.test".to_string()]);
}

#[tokio::test]
async fn non_html_responses_contribute_nothing() {
    let (base, _hits) = spawn_server(vec![(
        "/".to_string(),
        "text/plain".to_string(),
        "plain-text page with visible@acme.test".to_string(),
    )])
    .await;

    let config = test_config();
    let scout = test_scout(&config).await;
    let report = scout
        .discover(
            &config,
            &base,
            &[],
            DiscoveryOptions {
                max_pages: 1,
                verify: false,
            },
        )
        .await
        .expect("discover");

    assert!(report.addresses().is_empty());
}

#[tokio::test]
async fn guessing_without_verification_keeps_all_patterns() {
    let config = test_config();
    let scout = test_scout(&config).await;

    let names = vec!["Maria Gomez".to_string(), "Madonna".to_string()];
    let report = scout
        .discover(
            &config,
            "acme.test",
            &names,
            DiscoveryOptions {
                max_pages: 0,
                verify: false,
            },
        )
        .await
        .expect("discover");

    let addresses = report.addresses();
    assert!(addresses.contains(&"maria@acme.test".to_string()));
    assert!(addresses.contains(&"maria.gomez@acme.test".to_string()));
    assert!(addresses.contains(&"mariagomez@acme.test".to_string()));
    assert!(addresses.contains(&"gomez@acme.test".to_string()));
    // One valid name, full template set; "Madonna" contributes nothing.
    assert_eq!(addresses.len(), 10);
    assert!(addresses.iter().all(|a| a.ends_with("@acme.test")));
    assert!(addresses.iter().all(|a| *a == a.to_lowercase()));

    let mut sorted = addresses.clone();
    sorted.sort();
    assert_eq!(addresses, sorted);

    assert_eq!(report.domain_status, DomainStatus::Unchecked);
    assert!(report
        .methods_used
        .iter()
        .any(|m| m == "pattern_generation"));
}

#[tokio::test]
async fn scraped_addresses_are_not_guessed_again() {
    let (base, _hits) = spawn_server(vec![page("/", "Reach maria.gomez@127.0.0.1 here")]).await;

    let config = test_config();
    let scout = test_scout(&config).await;
    let report = scout
        .discover(
            &config,
            &base,
            &["Maria Gomez".to_string()],
            DiscoveryOptions {
                max_pages: 1,
                verify: false,
            },
        )
        .await
        .expect("discover");

    let duplicates = report
        .found
        .iter()
        .filter(|f| f.email.starts_with("maria.gomez@"))
        .count();
    assert_eq!(duplicates, 1, "scraped address must not be re-added by guessing");
    // One scraped + the remaining nine patterns.
    assert_eq!(report.found.len(), 10);
}

//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use url::Url;
    use webone::core::{build_form_request, purify_target, PurifyOptions};
    use webone::network::FetchRequest;

    use crate::common::{html_document, StubFetcher};

    #[test]
    fn fetched_page_is_purified() {
        let fetcher = StubFetcher::new().with_page(
            "http://example.com/",
            "<html><head><title>Home</title></head><body><p>hi<img src=x></p></body></html>",
        );
        let request = FetchRequest::Get(Url::parse("http://example.com/").unwrap());

        let page = purify_target(&fetcher, &PurifyOptions::default(), &request).unwrap();
        let output = String::from_utf8(page.data).unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert!(output.contains("<p>hi</p>"));
        assert!(!output.contains("<img"));
    }

    #[test]
    fn links_resolve_against_final_url() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.com/old",
            html_document(
                "https://www.example.com/new/",
                r#"<p><a href="next">next</a></p>"#,
            ),
        );
        let request = FetchRequest::Get(Url::parse("http://example.com/old").unwrap());

        let page = purify_target(&fetcher, &PurifyOptions::default(), &request).unwrap();
        let output = String::from_utf8(page.data).unwrap();

        assert_eq!(page.source_url.as_str(), "https://www.example.com/new/");
        assert!(output.contains(
            r#"<a href="/search?query=https%3A%2F%2Fwww.example.com%2Fnew%2Fnext">next</a>"#
        ));
    }

    #[test]
    fn get_form_rebuilt_with_query() {
        let source = Url::parse("http://example.com/a/").unwrap();
        let fields = vec![
            ("q".to_string(), "rust lang".to_string()),
            ("origin_action".to_string(), "/s".to_string()),
            ("origin_method".to_string(), "get".to_string()),
        ];

        let request = build_form_request(&fields, Some(&source)).unwrap();

        assert_eq!(
            request,
            FetchRequest::Get(Url::parse("http://example.com/s?q=rust+lang").unwrap())
        );
    }

    #[test]
    fn post_form_forwarded() {
        let fields = vec![
            ("origin_method".to_string(), "POST".to_string()),
            ("origin_action".to_string(), "https://example.org/login".to_string()),
            ("user".to_string(), "me".to_string()),
        ];

        let request = build_form_request(&fields, None).unwrap();

        assert_eq!(
            request,
            FetchRequest::Post {
                url: Url::parse("https://example.org/login").unwrap(),
                form: vec![("user".to_string(), "me".to_string())],
            }
        );

        let fetcher = StubFetcher::new()
            .with_page("https://example.org/login", "<p>welcome</p>");
        let page = purify_target(&fetcher, &PurifyOptions::default(), &request).unwrap();

        assert!(String::from_utf8(page.data).unwrap().contains("<p>welcome</p>"));
        assert_eq!(fetcher.requests(), vec![request]);
    }

    #[test]
    fn empty_action_targets_source_page() {
        let source = Url::parse("http://example.com/a/page?old=1").unwrap();
        let fields = vec![
            ("origin_action".to_string(), String::new()),
            ("k".to_string(), "v".to_string()),
        ];

        let request = build_form_request(&fields, Some(&source)).unwrap();

        assert_eq!(request.url().as_str(), "http://example.com/a/page?k=v");
        assert!(request.is_get());
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use url::Url;
    use webone::core::{build_form_request, purify_target, PurifyOptions, WebOneError};
    use webone::network::{FetchRequest, FetchedDocument};

    use crate::common::StubFetcher;

    #[test]
    fn upstream_404_reported_without_parsing() {
        let fetcher =
            StubFetcher::new().with_status("http://example.com/missing", 404, "<h1>Not Found</h1>");
        let request = FetchRequest::Get(Url::parse("http://example.com/missing").unwrap());

        let result = purify_target(&fetcher, &PurifyOptions::default(), &request);

        assert_eq!(fetcher.calls(), 1);
        match result {
            Err(WebOneError::Fetch { status, body, .. }) => {
                assert_eq!(status, Some(404));
                assert_eq!(body, "<h1>Not Found</h1>");
            }
            other => panic!("expected fetch failure, got {:?}", other.map(|p| p.source_url)),
        }
    }

    #[test]
    fn non_markup_response_rejected() {
        let fetcher = StubFetcher::new().with_document(
            "http://example.com/logo.png",
            FetchedDocument {
                data: vec![0x89, b'P', b'N', b'G'],
                final_url: Url::parse("http://example.com/logo.png").unwrap(),
                media_type: "image/png".to_string(),
                charset: None,
            },
        );
        let request = FetchRequest::Get(Url::parse("http://example.com/logo.png").unwrap());

        assert!(matches!(
            purify_target(&fetcher, &PurifyOptions::default(), &request),
            Err(WebOneError::Parse(_))
        ));
    }

    #[test]
    fn unsupported_form_method() {
        let fields = vec![
            ("origin_action".to_string(), "http://example.com/r".to_string()),
            ("origin_method".to_string(), "put".to_string()),
        ];

        assert!(matches!(
            build_form_request(&fields, None),
            Err(WebOneError::UnsupportedMethod(method)) if method == "put"
        ));
    }

    #[test]
    fn missing_or_unresolvable_action() {
        let no_action = vec![("q".to_string(), "x".to_string())];
        assert!(matches!(
            build_form_request(&no_action, None),
            Err(WebOneError::InvalidTarget { .. })
        ));

        let relative = vec![("origin_action".to_string(), "/s".to_string())];
        assert!(matches!(
            build_form_request(&relative, None),
            Err(WebOneError::InvalidTarget { .. })
        ));
    }
}

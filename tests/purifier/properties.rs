//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use markup5ever_rcdom::{NodeData, RcDom};
    use url::Url;
    use webone::core::{ProxyRoutes, RequestContext};
    use webone::parsers::{Purifier, TagPolicy};

    use crate::common::{HtmlTestHelper, SOURCE_URL};

    const MESSY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title> Messy </title>
  <script>track()</script>
  <style>body { color: red }</style>
  <meta charset="utf-8">
</head>
<body class="c" onload="init()">
  <div id="d" style="margin: 0">
    <p>   </p>
    <img src="i.png">
    <span title="t">kept</span>
  </div>
  <table border="1"><tr><td colspan="2" align="center"></td><td>v</td></tr></table>
  <ul><li><a href="/x" target="_blank">l</a></li><li> </li></ul>
  <form action="/s"><input type="text" name="q"><select><option>o</option></select></form>
  <iframe src="frame.html"></iframe>
  <!-- tracking -->
  <div><div></div></div>
</body>
</html>"#;

    fn filtered(policy: &TagPolicy) -> RcDom {
        let dom = HtmlTestHelper::parse(MESSY_PAGE);
        let routes = ProxyRoutes::default();
        let context = RequestContext::new(Url::parse(SOURCE_URL).unwrap(), &routes);
        Purifier::filter_only(policy)
            .purify(&dom.document, &context)
            .unwrap();
        dom
    }

    #[test]
    fn only_whitelisted_elements_survive() {
        let policy = TagPolicy::default();
        let dom = filtered(&policy);

        for element in HtmlTestHelper::elements(&dom.document) {
            let name = HtmlTestHelper::element_name(&element);
            assert!(policy.is_allowed_tag(&name), "unexpected <{}>", name);
        }
    }

    #[test]
    fn only_whitelisted_attributes_survive() {
        let policy = TagPolicy::default();
        let dom = filtered(&policy);

        for element in HtmlTestHelper::elements(&dom.document) {
            let name = HtmlTestHelper::element_name(&element);
            if policy.keeps_all_attrs(&name) {
                continue;
            }
            for attr in HtmlTestHelper::attribute_names(&element) {
                assert!(
                    policy.is_allowed_attr(&attr),
                    "unexpected {} on <{}>",
                    attr,
                    name
                );
            }
        }
    }

    #[test]
    fn exempt_elements_keep_all_attributes() {
        let policy = TagPolicy::default();
        let dom = filtered(&policy);

        let input = HtmlTestHelper::elements(&dom.document)
            .into_iter()
            .find(|element| HtmlTestHelper::element_name(element) == "input")
            .unwrap();

        assert_eq!(HtmlTestHelper::attribute_names(&input), vec!["type", "name"]);
    }

    #[test]
    fn no_empty_shells_remain() {
        let policy = TagPolicy::default();
        let dom = filtered(&policy);

        for element in HtmlTestHelper::elements(&dom.document) {
            let name = HtmlTestHelper::element_name(&element);
            assert!(
                !element.children.borrow().is_empty() || policy.is_allowed_empty(&name),
                "empty <{}> left behind",
                name
            );
        }
    }

    #[test]
    fn no_blank_text_or_comments_remain() {
        let dom = filtered(&TagPolicy::default());

        fn check(handle: &markup5ever_rcdom::Handle) {
            for child in handle.children.borrow().iter() {
                match child.data {
                    NodeData::Text { ref contents } => {
                        assert!(!contents.borrow().trim().is_empty());
                    }
                    NodeData::Comment { .. } => panic!("comment left behind"),
                    _ => check(child),
                }
            }
        }

        check(&dom.document);
    }

    #[test]
    fn filtering_is_idempotent() {
        let policy = TagPolicy::default();

        let once = HtmlTestHelper::filter(MESSY_PAGE, &policy);
        let twice = HtmlTestHelper::filter(&once, &policy);

        assert_eq!(once, twice);
        assert!(once.contains("<span>kept</span>"));
        assert!(once.contains("<td colspan=\"2\"></td>"));
    }
}

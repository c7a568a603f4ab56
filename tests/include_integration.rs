//! Include expansion against real template directories

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use section_template::HtmlTemplate;
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_include_is_expanded_before_sections() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    write(dir.path(), "page.tpl", "<main>{INCLUDE:parts/list.tpl}</main>{INCLUDE:parts/footer.tpl}");
    write(
        dir.path(),
        "parts/list.tpl",
        "<!-- BEGIN item -->\n<p>{item.text}</p>\n<!-- END item -->",
    );
    write(dir.path(), "parts/footer.tpl", "<footer>{year}</footer>");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    tpl.assign_files([("page", "page.tpl")]).unwrap();
    tpl.assign_section("item", &json!({"text": "one"})).unwrap();
    tpl.assign_section("item", &json!({"text": "two"})).unwrap();
    tpl.assign_vars(&json!({"year": 2024}), None).unwrap();

    assert_eq!(
        tpl.render("page").unwrap(),
        "<main><p>one</p><p>two</p></main><footer>2024</footer>"
    );
}

#[test]
fn test_include_resolves_next_to_the_including_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site/page.tpl", "[{INCLUDE:nav.tpl}]");
    write(dir.path(), "site/nav.tpl", "site nav");
    write(dir.path(), "nav.tpl", "root nav");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    tpl.assign_files([("page", "site/page.tpl")]).unwrap();
    assert_eq!(tpl.render("page").unwrap(), "[site nav]");
}

#[test]
fn test_include_cannot_leave_template_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "site/page.tpl", "[{INCLUDE:../secret.tpl}]({INCLUDE:./nav.tpl})");
    write(dir.path(), "secret.tpl", "secret");
    write(dir.path(), "site/nav.tpl", "nav");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    tpl.assign_files([("page", "site/page.tpl")]).unwrap();

    // ../secret.tpl is looked up as site/secret.tpl, which does not exist
    assert_eq!(tpl.render("page").unwrap(), "[](nav)");
}

#[test]
fn test_missing_include_renders_empty() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "page.tpl", "before {INCLUDE:missing.tpl}after");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    tpl.assign_files([("page", "page.tpl")]).unwrap();
    assert_eq!(tpl.render("page").unwrap(), "before after");
}

#[test]
fn test_nested_include_markers_stay_literal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "page.tpl", "{INCLUDE:a.tpl}");
    write(dir.path(), "a.tpl", "a{INCLUDE:b.tpl}");
    write(dir.path(), "b.tpl", "b");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    tpl.assign_files([("page", "page.tpl")]).unwrap();
    assert_eq!(tpl.render("page").unwrap(), "a{INCLUDE:b.tpl}");
}

#[test]
fn test_render_str_does_not_expand_includes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "part.tpl", "part");

    let mut tpl = HtmlTemplate::new(dir.path(), None);
    assert_eq!(tpl.render_str("{INCLUDE:part.tpl}"), "{INCLUDE:part.tpl}");
}

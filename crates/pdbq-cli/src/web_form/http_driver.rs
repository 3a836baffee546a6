//! [`FormDriver`] over plain HTTP
//!
//! Loads the page HTML with reqwest, finds controls by element id with
//! scraper, remembers the values set on them and submits the enclosing form
//! the way a browser would (successful controls only, urlencoded). No
//! JavaScript runs, so controls are ready as soon as the page has loaded.

use super::{ControlState, FormDriver, FormOutcome};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

struct LoadedPage {
    url: Url,
    html: String,
}

/// Form driver backed by a reqwest client
pub struct HttpFormDriver {
    client: Client,
    page: Option<LoadedPage>,
    /// Values set on controls, keyed by element id
    values: HashMap<String, String>,
}

impl HttpFormDriver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            page: None,
            values: HashMap::new(),
        }
    }

    fn page(&self) -> Result<&LoadedPage> {
        self.page
            .as_ref()
            .ok_or_else(|| CliError::invalid_input("no page loaded; call open() first"))
    }

    async fn load(&mut self, request: reqwest::RequestBuilder) -> Result<FormOutcome> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            tracing::error!(%url, status = status.as_u16(), "Form page request failed");
            return Err(CliError::transport(url.as_str(), status));
        }

        let html = response.text().await?;
        debug!(%url, bytes = html.len(), "Loaded page");

        self.page = Some(LoadedPage {
            url: url.clone(),
            html,
        });
        self.values.clear();

        Ok(FormOutcome {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl FormDriver for HttpFormDriver {
    async fn open(&mut self, url: &str) -> Result<()> {
        let url = Url::parse(url)?;
        let request = self.client.get(url);
        self.load(request).await.map(|_| ())
    }

    async fn control_state(&mut self, control: &str) -> Result<ControlState> {
        let page = self.page()?;
        let document = Html::parse_document(&page.html);
        Ok(match find_control(&document, control)? {
            None => ControlState::Absent,
            Some(el) if is_disabled(&el) || is_hidden(&el) => ControlState::Present,
            Some(_) => ControlState::Interactable,
        })
    }

    async fn select_option(&mut self, control: &str, value: &str) -> Result<()> {
        let page = self.page()?;
        let document = Html::parse_document(&page.html);
        let el = require_control(&document, control)?;

        if el.value().name() != "select" {
            return Err(CliError::invalid_input(format!("control '{}' is not a select", control)));
        }
        if !select_options(&el).iter().any(|(v, _)| v == value) {
            return Err(CliError::invalid_input(format!(
                "select '{}' has no option '{}'",
                control, value
            )));
        }

        self.values.insert(control.to_string(), value.to_string());
        Ok(())
    }

    async fn type_text(&mut self, control: &str, text: &str) -> Result<()> {
        let page = self.page()?;
        let document = Html::parse_document(&page.html);
        let el = require_control(&document, control)?;

        let accepts_text = match el.value().name() {
            "textarea" => true,
            "input" => !matches!(
                input_type(&el).as_str(),
                "submit" | "button" | "reset" | "image" | "checkbox" | "radio" | "file" | "hidden"
            ),
            _ => false,
        };
        if !accepts_text {
            return Err(CliError::invalid_input(format!("control '{}' does not accept text", control)));
        }

        self.values.insert(control.to_string(), text.to_string());
        Ok(())
    }

    async fn click(&mut self, control: &str) -> Result<FormOutcome> {
        let submission = {
            let page = self.page()?;
            build_submission(&page.html, &page.url, &self.values, control)?
        };

        debug!(
            method = ?submission.method,
            url = %submission.action,
            fields = submission.fields.len(),
            "Submitting form"
        );

        let request = match submission.method {
            FormMethod::Get => {
                let mut url = submission.action;
                url.set_query(None);
                url.query_pairs_mut().extend_pairs(&submission.fields);
                self.client.get(url)
            },
            FormMethod::Post => self.client.post(submission.action).form(&submission.fields),
        };

        self.load(request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMethod {
    Get,
    Post,
}

/// What a click on a submit control sends
#[derive(Debug)]
struct Submission {
    method: FormMethod,
    action: Url,
    fields: Vec<(String, String)>,
}

fn id_selector(id: &str) -> Result<Selector> {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    Selector::parse(&format!("[id=\"{}\"]", escaped))
        .map_err(|e| CliError::invalid_input(format!("bad control id '{}': {:?}", id, e)))
}

fn static_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CliError::Other(anyhow::anyhow!("selector '{}': {:?}", css, e)))
}

fn find_control<'a>(document: &'a Html, id: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = id_selector(id)?;
    Ok(document.select(&selector).next())
}

fn require_control<'a>(document: &'a Html, id: &str) -> Result<ElementRef<'a>> {
    find_control(document, id)?.ok_or_else(|| CliError::FormControlNotFound(id.to_string()))
}

fn is_disabled(el: &ElementRef<'_>) -> bool {
    el.value().attr("disabled").is_some()
}

fn is_hidden(el: &ElementRef<'_>) -> bool {
    el.value().name() == "input" && input_type(el) == "hidden"
}

fn input_type(el: &ElementRef<'_>) -> String {
    el.value().attr("type").unwrap_or("text").to_ascii_lowercase()
}

fn is_submit_control(el: &ElementRef<'_>) -> bool {
    match el.value().name() {
        "button" => matches!(el.value().attr("type").map(str::to_ascii_lowercase).as_deref(), None | Some("submit")),
        "input" => matches!(input_type(el).as_str(), "submit" | "image"),
        _ => false,
    }
}

/// `(value, selected)` for each option; value falls back to the option text
fn select_options(el: &ElementRef<'_>) -> Vec<(String, bool)> {
    let Ok(option) = static_selector("option") else {
        return Vec::new();
    };
    el.select(&option)
        .map(|opt| {
            let value = opt
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| opt.text().collect::<String>().trim().to_string());
            (value, opt.value().attr("selected").is_some())
        })
        .collect()
}

fn enclosing_form<'a>(document: &'a Html, el: &ElementRef<'a>) -> Result<Option<ElementRef<'a>>> {
    if let Some(form_id) = el.value().attr("form") {
        return find_control(document, form_id);
    }
    Ok(el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form"))
}

/// Collect the successful controls of the form that `clicked` submits
fn build_submission(
    html: &str,
    page_url: &Url,
    values: &HashMap<String, String>,
    clicked: &str,
) -> Result<Submission> {
    let document = Html::parse_document(html);
    let button = require_control(&document, clicked)?;
    if !is_submit_control(&button) {
        return Err(CliError::invalid_input(format!("control '{}' does not submit a form", clicked)));
    }

    let form = enclosing_form(&document, &button)?
        .ok_or_else(|| CliError::malformed(format!("control '{}' is not inside a form", clicked)))?;

    let method = match form.value().attr("method").map(str::to_ascii_lowercase).as_deref() {
        Some("post") => FormMethod::Post,
        _ => FormMethod::Get,
    };
    let action = match form.value().attr("action").map(str::trim) {
        Some(action) if !action.is_empty() => page_url.join(action)?,
        _ => page_url.clone(),
    };

    let controls = static_selector("input, select, textarea, button")?;
    let mut fields = Vec::new();

    for el in form.select(&controls) {
        let Some(name) = el.value().attr("name") else {
            continue;
        };
        if is_disabled(&el) {
            continue;
        }
        let id = el.value().attr("id");
        let set_value = id.and_then(|id| values.get(id)).cloned();

        let value = match el.value().name() {
            "select" => set_value.or_else(|| {
                let options = select_options(&el);
                options
                    .iter()
                    .find(|(_, selected)| *selected)
                    .or_else(|| options.first())
                    .map(|(v, _)| v.clone())
            }),
            "textarea" => Some(set_value.unwrap_or_else(|| el.text().collect())),
            "button" => (id == Some(clicked)).then(|| el.value().attr("value").unwrap_or("").to_string()),
            _ => match input_type(&el).as_str() {
                "submit" | "image" => {
                    (id == Some(clicked)).then(|| el.value().attr("value").unwrap_or("").to_string())
                },
                "button" | "reset" | "file" => None,
                "checkbox" | "radio" => el
                    .value()
                    .attr("checked")
                    .map(|_| el.value().attr("value").unwrap_or("on").to_string()),
                _ => Some(set_value.unwrap_or_else(|| el.value().attr("value").unwrap_or("").to_string())),
            },
        };

        if let Some(value) = value {
            fields.push((name.to_string(), value));
        }
    }

    Ok(Submission {
        method,
        action,
        fields,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const FORM: &str = r#"<html><body>
<form id="queryForm" action="/pdb/search/smart.do" method="post">
  <input type="hidden" name="smartSearchSubtype" value="legacy"/>
  <select id="smartSearchSubtype_0" name="smartSearchSubtype_0">
    <option value="">Choose a Query Type</option>
    <option value="StructTitleQuery">Structure Title</option>
    <option value="StructDescQuery" selected>Structure Description</option>
  </select>
  <select id="struct.title.comparator_0" name="struct.title.comparator_0">
    <option>contains</option>
    <option>equals</option>
  </select>
  <input type="text" id="struct.title.value_0" name="struct.title.value_0" value=""/>
  <input type="text" id="locked_0" name="locked_0" value="x" disabled/>
  <input type="checkbox" name="exactMatch" value="yes"/>
  <input type="checkbox" name="showSequences" checked/>
  <input type="submit" id="doSearch" name="doSearch" value="Submit Query"/>
  <input type="submit" id="other" name="other" value="Other"/>
</form>
<button id="orphan">Orphan</button>
</body></html>"#;

    fn page_url() -> Url {
        Url::parse("http://example.org/pdb/search/advSearch.do?search=new").unwrap()
    }

    #[test]
    fn test_submission_collects_successful_controls() {
        let mut values = HashMap::new();
        values.insert("smartSearchSubtype_0".to_string(), "StructTitleQuery".to_string());
        values.insert("struct.title.value_0".to_string(), "ribosome".to_string());

        let submission = build_submission(FORM, &page_url(), &values, "doSearch").unwrap();

        assert_eq!(submission.method, FormMethod::Post);
        assert_eq!(submission.action.as_str(), "http://example.org/pdb/search/smart.do");

        let fields: Vec<(&str, &str)> = submission
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("smartSearchSubtype", "legacy"),
                ("smartSearchSubtype_0", "StructTitleQuery"),
                ("struct.title.comparator_0", "contains"),
                ("struct.title.value_0", "ribosome"),
                ("showSequences", "on"),
                ("doSearch", "Submit Query"),
            ]
        );
    }

    #[test]
    fn test_unset_select_uses_selected_option() {
        let submission = build_submission(FORM, &page_url(), &HashMap::new(), "doSearch").unwrap();
        assert!(submission
            .fields
            .contains(&("smartSearchSubtype_0".to_string(), "StructDescQuery".to_string())));
    }

    #[test]
    fn test_button_outside_form() {
        let result = build_submission(FORM, &page_url(), &HashMap::new(), "orphan");
        assert!(matches!(result, Err(CliError::MalformedResponse(_))));
    }

    #[test]
    fn test_text_input_does_not_submit() {
        let result = build_submission(FORM, &page_url(), &HashMap::new(), "struct.title.value_0");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_control() {
        let result = build_submission(FORM, &page_url(), &HashMap::new(), "nothere");
        assert!(matches!(result, Err(CliError::FormControlNotFound(_))));
    }

    #[test]
    fn test_control_lookup_with_dotted_id() {
        let document = Html::parse_document(FORM);
        let el = find_control(&document, "struct.title.value_0").unwrap().unwrap();
        assert_eq!(el.value().attr("name"), Some("struct.title.value_0"));

        let locked = find_control(&document, "locked_0").unwrap().unwrap();
        assert!(is_disabled(&locked));
    }

    #[test]
    fn test_get_form_defaults_to_page_url() {
        let html = r#"<form><input type="text" id="q" name="q"/><button id="go">Go</button></form>"#;
        let mut values = HashMap::new();
        values.insert("q".to_string(), "actin".to_string());

        let submission = build_submission(html, &page_url(), &values, "go").unwrap();
        assert_eq!(submission.method, FormMethod::Get);
        assert_eq!(submission.action, page_url());
        assert_eq!(submission.fields, vec![("q".to_string(), "actin".to_string())]);
    }
}

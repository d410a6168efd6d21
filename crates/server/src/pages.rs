//! Minimal HTML rendering for the form and result pages.

const PAGE_STYLE: &str = "body{font-family:sans-serif;max-width:640px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.5rem}fieldset{margin-top:1rem}";

/// The static input form
pub fn index_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Anemia Risk Predictor</title><style>{PAGE_STYLE}</style></head>
<body>
<h1>Anemia Risk Predictor</h1>
<form action="/predict" method="post">
  <label>Age <input type="number" name="age" step="0.1" min="0" required></label>
  <label>Gender
    <select name="gender"><option value="0">Female</option><option value="1">Male</option></select>
  </label>
  <label>Diet
    <select name="diet"><option value="0">Poor</option><option value="1">Average</option><option value="2">Good</option></select>
  </label>
  <label>Physical activity
    <select name="activity"><option value="0">Low</option><option value="1">Medium</option><option value="2">High</option></select>
  </label>
  <label>Menstrual cycle
    <select name="menstrual_cycle"><option value="0">Regular</option><option value="1">Irregular</option></select>
  </label>
  <label>Iron intake
    <select name="iron_intake"><option value="0">Low</option><option value="1">Medium</option><option value="2">High</option></select>
  </label>
  <label>Sleep duration
    <select name="sleep_duration"><option value="0">Short</option><option value="1">Normal</option><option value="2">Long</option></select>
  </label>
  <label>BMI category
    <select name="bmi"><option value="0">Underweight</option><option value="1">Normal</option><option value="2">Overweight</option><option value="3">Obese</option></select>
  </label>
  <fieldset>
    <legend>Symptoms</legend>
    <label><input type="checkbox" name="pale_skin" value="1"> Pale skin</label>
    <label><input type="checkbox" name="cold_hands_legs" value="1"> Cold hands and legs</label>
    <label><input type="checkbox" name="weakness" value="1"> Weakness</label>
    <label><input type="checkbox" name="dizziness" value="1"> Dizziness</label>
    <label><input type="checkbox" name="short_breath" value="1"> Shortness of breath</label>
    <label><input type="checkbox" name="brittle_nails" value="1"> Brittle nails</label>
    <label><input type="checkbox" name="sore_tongue" value="1"> Sore tongue</label>
    <label><input type="checkbox" name="pica" value="1"> Pica</label>
    <label><input type="checkbox" name="hair_loss" value="1"> Hair loss</label>
    <label><input type="checkbox" name="poor_concentration" value="1"> Poor concentration</label>
  </fieldset>
  <p><button type="submit">Predict</button></p>
</form>
</body>
</html>"#
    )
}

/// The prediction result page
pub fn result_page(prediction: &str, explanation: &str, recommendations: &[String]) -> String {
    let items: String = recommendations
        .iter()
        .map(|rec| format!("  <li>{}</li>\n", escape(rec)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Anemia Risk Result</title><style>{PAGE_STYLE}</style></head>
<body>
<h1>{}</h1>
<p><strong>Main factors:</strong> {}</p>
<h2>Recommendations</h2>
<ul>
{}</ul>
<p><a href="/">Back to the form</a></p>
</body>
</html>"#,
        escape(prediction),
        escape(explanation),
        items
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_contains_all_fields() {
        let page = index_page();
        for field in anemia_core::FEATURE_NAMES {
            assert!(page.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
    }

    #[test]
    fn test_result_page_renders_sections() {
        let page = result_page(
            "At Risk of Anemia",
            "diet (increases risk by 0.42)",
            &["Eat more spinach.".to_string()],
        );
        assert!(page.contains("At Risk of Anemia"));
        assert!(page.contains("diet (increases risk by 0.42)"));
        assert!(page.contains("<li>Eat more spinach.</li>"));
    }

    #[test]
    fn test_escape_markup() {
        let page = result_page("<script>", "", &[]);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}

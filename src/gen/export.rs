// JSON views of a model, embedded in the index page and used for reference checks.

use crate::gen::config_reader::Translations;
use crate::gen::*;

/// The pages generated for the answers and the characteristics, relative to
/// the output directory.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PageLinks {
    pub details: Vec<(Value, String)>,
    pub categories: Vec<(String, String)>,
}

impl PageLinks {
    pub fn details_page(&self, answer: &Value) -> Option<&str> {
        self.details
            .iter()
            .find(|(a, _)| a == answer)
            .map(|(_, p)| p.as_str())
    }
}

fn values_list(values: &[Value]) -> JSValue {
    json!(values.iter().map(|v| v.to_string()).collect::<Vec<String>>())
}

/// Column -> possible values, all in their displayed form.
pub fn values_json(model: &Model) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    for (name, values) in model.possible_values().iter() {
        js.insert(name.clone(), values_list(values));
    }
    JSValue::Object(js)
}

/// Answer -> characteristic -> value -> weight.
pub fn weights_json(model: &Model) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    for aw in model.weights().answers().iter() {
        let mut chars: JSMap<String, JSValue> = JSMap::new();
        for (name, weights) in aw.characteristics.iter() {
            let mut values: JSMap<String, JSValue> = JSMap::new();
            for (v, w) in weights.iter() {
                values.insert(v.to_string(), json!(w));
            }
            chars.insert(name.clone(), JSValue::Object(values));
        }
        js.insert(aw.answer.to_string(), JSValue::Object(chars));
    }
    JSValue::Object(js)
}

/// The data checked against a reference file.
pub fn model_json(model: &Model) -> JSValue {
    json!({
        "answerColumn": model.table().answer_column(),
        "columns": model.table().columns(),
        "values": values_json(model),
        "weights": weights_json(model),
    })
}

// Keeps a JSON literal from closing the script element it is embedded in.
fn script_literal(js: &JSValue) -> String {
    js.to_string().replace("</", "<\\/")
}

/// The constants read by the navigation script.
pub fn script_data(
    model: &Model,
    links: &PageLinks,
    translations: &Translations,
    policy: RankingPolicy,
) -> String {
    let answers: Vec<String> = model
        .weights()
        .answers()
        .iter()
        .map(|aw| aw.answer.to_string())
        .collect();
    let mut details: JSMap<String, JSValue> = JSMap::new();
    for (answer, page) in links.details.iter() {
        details.insert(answer.to_string(), json!(page));
    }
    let mut categories: JSMap<String, JSValue> = JSMap::new();
    for (name, page) in links.categories.iter() {
        categories.insert(name.clone(), json!(page));
    }

    let constants: Vec<(&str, JSValue)> = vec![
        ("ANSWER_COLUMN", json!(model.table().answer_column())),
        ("COLUMNS_LIST", json!(model.table().columns())),
        ("ANSWERS_LIST", json!(answers)),
        ("VALUES_DICT", values_json(model)),
        ("CATEGORY_PAGE", JSValue::Object(categories)),
        ("DETAILS_PAGE", JSValue::Object(details)),
        ("WEIGHTS_DICT", weights_json(model)),
        ("TRANSLATION_DICT", translations.to_json()),
        ("RANKING_POLICY", json!(policy.keyword())),
    ];
    constants
        .iter()
        .map(|(name, js)| format!("const {} = {};", name, script_literal(js)))
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rank_model::builder::Builder;

    fn model() -> Model {
        let mut b = Builder::new(&["name", "size", "legs"])
            .data_type("legs", "int")
            .unwrap()
            .order("size", "small, large");
        b.add_row(&["table", "large", "4"]);
        b.add_row(&["</script>", "small", "3"]);
        b.build().unwrap()
    }

    #[test]
    fn weights_by_display_form() {
        let js = weights_json(&model());
        assert_eq!(js["table"]["size"]["small"], json!(0.5));
        assert_eq!(js["table"]["legs"]["4"], json!(1.0));
        assert_eq!(js["table"]["legs"]["3"], json!(0.0));
    }

    #[test]
    fn constants_are_escaped() {
        let data = script_data(
            &model(),
            &PageLinks::default(),
            &Translations::default(),
            RankingPolicy::Product,
        );
        assert!(data.contains("const ANSWER_COLUMN = \"name\";"));
        assert!(data.contains("const RANKING_POLICY = \"product\";"));
        assert!(data.contains("const COLUMNS_LIST = [\"name\",\"size\",\"legs\"];"));
        assert!(!data.contains("</script>"));
        assert!(data.contains("<\\/script>"));
    }
}

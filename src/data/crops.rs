use crate::models::crop::Crop;

/// Built-in crop catalogue: (id, name, colour).
const BUILT_IN: [(&str, &str, &str); 10] = [
    ("tomato", "Tomato", "#E53935"),
    ("eggplant", "Eggplant", "#5E35B1"),
    ("cucumber", "Cucumber", "#43A047"),
    ("carrot", "Carrot", "#FB8C00"),
    ("daikon", "Daikon", "#FAFAFA"),
    ("spinach", "Spinach", "#2E7D32"),
    ("cabbage", "Cabbage", "#81C784"),
    ("potato", "Potato", "#795548"),
    ("onion", "Onion", "#FFCC80"),
    ("pepper", "Green pepper", "#66BB6A"),
];

const GUIDE_BASE_URL: &str = "https://sakata-tsushin.com/lesson-vegetable";

pub fn get_built_in_crops() -> Vec<Crop> {
    BUILT_IN
        .iter()
        .map(|(id, name, color)| Crop::new(*id, *name, *color))
        .collect()
}

pub fn is_built_in(id: &str) -> bool {
    BUILT_IN.iter().any(|(builtin, _, _)| *builtin == id)
}

/// Built-ins first, then user-added crops.
pub fn merge_catalogue(custom: &[Crop]) -> Vec<Crop> {
    let mut all = get_built_in_crops();
    all.extend(custom.iter().cloned());
    all
}

pub fn find_crop<'a>(catalogue: &'a [Crop], id: &str) -> Option<&'a Crop> {
    catalogue.iter().find(|c| c.id == id)
}

/// Link to a growing guide for built-in crops.
pub fn guide_link(crop_id: &str) -> Option<String> {
    let page = match crop_id {
        "tomato" => 1,
        "eggplant" => 2,
        "cucumber" => 3,
        "pepper" => 4,
        "cabbage" => 7,
        "daikon" => 8,
        "potato" => 11,
        "spinach" => 14,
        "onion" => 16,
        "carrot" => 20,
        _ => return None,
    };
    Some(format!("{GUIDE_BASE_URL}/detail_{page}/"))
}

use crate::schema::Domain;
use indexmap::IndexMap;

/// Renders `["a", "b", "c"]` as `"a, b and c"`.
pub fn and_values(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Composes the agent's report on a search from informed and requested fields.
///
/// `inform` holds plain fields plus `choice`, `rec_name` and `book_name`;
/// `request` lists the fields to ask the user about.
pub fn compose_search_message(
    domain: Domain,
    nresults0: usize,
    inform: &IndexMap<String, Vec<String>>,
    request: &[String],
) -> String {
    let get = |field: &str| inform.get(field).filter(|v| !v.is_empty());
    let recommended = inform.contains_key("rec_name");
    let booked = inform.contains_key("book_name");
    let mut parts: Vec<String> = Vec::new();

    if let Some(names) = get("name") {
        if !recommended && !booked {
            parts.push(format!("I have found {}", and_values(names)));
        }
    }

    if inform.contains_key("choice") {
        parts.push(format!("There are {} matching results", nresults0));
    } else if nresults0 > 1 && !booked && !inform.contains_key("name") {
        parts.push(format!("I see several ({}) matches", nresults0));
    }

    if let Some(types) = get("type") {
        parts.push(format!("of type {}", and_values(types)));
    }
    if let Some(areas) = get("area") {
        parts.push(format!("In the {}", and_values(areas)));
    }

    match domain {
        Domain::Hotel => {
            if let Some(parking) = get("parking") {
                let kind = if parking[0] == "yes" || parking[0] == "free" {
                    String::new()
                } else {
                    format!("{} ", parking[0])
                };
                let all = if parking.len() == 1 { " for all of them" } else { "" };
                parts.push(format!("There is {}parking{}", kind, all));
            }
            if let Some(stars) = get("stars") {
                let lead = if nresults0 > 1 || stars.len() > 1 {
                    "They have"
                } else {
                    "It has"
                };
                parts.push(format!("{} {} stars", lead, and_values(stars)));
            }
        }
        Domain::Restaurant => {
            if let Some(food) = get("food") {
                let lead = if nresults0 > 1 || food.len() > 1 {
                    "They serve"
                } else {
                    "It serves"
                };
                parts.push(format!("{} {} food", lead, and_values(food)));
            }
        }
    }

    if let Some(address) = get("address") {
        parts.push(format!("It's located at {}", address[0]));
    }
    if let Some(phone) = get("phone") {
        parts.push(format!("The phone number is {}", phone[0]));
    }
    if let Some(postcode) = get("postcode") {
        parts.push(format!("The post code number is {}", postcode[0]));
    }
    if let Some(price) = get("pricerange") {
        parts.push(format!("The price is {}", price[0]));
    }
    if let Some(name) = get("rec_name") {
        parts.push(format!("I recommend {}", name[0]));
    }
    if let Some(name) = get("book_name") {
        parts.push(format!("I Have booked {}", name[0]));
    }

    if !request.is_empty() {
        let fields = request.join(" or ");
        if nresults0 > 0 {
            parts.push(format!("maybe select {}", fields));
        } else {
            parts.push(format!("Sorry, I can't find a match. Try a different {}", fields));
        }
    }
    parts.join(", ")
}

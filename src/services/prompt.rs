// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt construction for the text and image models.

use crate::models::{AdCopy, AdRequest};

/// Build the chat prompt asking for labelled ad copy.
pub fn text_prompt(req: &AdRequest) -> String {
    format!(
        "Create a compelling {format} advertisement in {language} with a {tone} tone.\n\
         \n\
         Product Name: {name}\n\
         Product/Service: {description}\n\
         Target Audience: {audience}\n\
         Business Type: {business}\n\
         Special Offer: {offer}\n\
         \n\
         Please format the response as:\n\
         HEADLINE: [Catchy headline]\n\
         AD_TEXT: [Main ad copy]\n\
         CTA: [Call to action]",
        format = req.ad_format,
        language = req.language,
        tone = req.tone,
        name = req.product_name,
        description = req.product_description,
        audience = req.target_audience,
        business = non_empty(req.business_type.as_deref()).unwrap_or("General"),
        offer = non_empty(req.special_offer.as_deref()).unwrap_or("None"),
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Visual theme picked from the product and the generated copy.
struct Scene {
    product: String,
    setting: &'static str,
    mood: &'static str,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn pick_scene(req: &AdRequest, copy: &AdCopy) -> Scene {
    let name = req.product_name.trim();
    let product_info = format!("{} {}", name, req.product_description).to_lowercase();
    let business = req.business_type.as_deref().unwrap_or("").to_lowercase();
    let copy_text = format!("{} {}", copy.headline, copy.ad_text).to_lowercase();

    if contains_any(&product_info, &["agarbatti", "incense"]) {
        let mood = if contains_any(&copy_text, &["peace", "calm", "tranquil", "serenity"]) {
            "peaceful zen atmosphere, soft warm lighting, meditative ambiance"
        } else if contains_any(&copy_text, &["divine", "spiritual", "blessing", "sacred"]) {
            "divine golden light, spiritual energy, heavenly atmosphere"
        } else if contains_any(&copy_text, &["home", "family", "love", "heart"]) {
            "warm family home, loving atmosphere, cozy indoor setting"
        } else {
            "traditional spiritual setting, warm golden tones, peaceful atmosphere"
        };
        Scene {
            product: format!("premium {} incense sticks package, elegant Indian packaging design", name),
            setting: "sacred temple setting, soft golden lighting, traditional Indian elements",
            mood,
        }
    } else if product_info.contains("gel") && business == "healthcare" {
        let mood = if contains_any(&copy_text, &["confidence", "beauty", "radiant"]) {
            "confident beauty, glowing skin, elegant sophistication"
        } else {
            "fresh clinical cleanliness, calm and trustworthy"
        };
        Scene {
            product: format!("elegant {} gel bottle, modern cosmetic packaging", name),
            setting: "clean spa-like setting, white marble background, professional beauty studio",
            mood,
        }
    } else if contains_any(&product_info, &["food", "restaurant", "cafe", "snack", "tea", "coffee"])
        || business.contains("food")
    {
        Scene {
            product: format!("appetizing {} presented on a styled table", name),
            setting: "warm restaurant interior, natural window light, rustic wooden surface",
            mood: if contains_any(&copy_text, &["fresh", "healthy", "organic"]) {
                "fresh vibrant colors, healthy lifestyle"
            } else {
                "inviting, delicious, cozy dining atmosphere"
            },
        }
    } else if contains_any(&product_info, &["app", "software", "tech", "phone", "laptop"])
        || business.contains("tech")
    {
        Scene {
            product: format!("sleek {} shown on a modern device screen", name),
            setting: "minimal modern workspace, soft gradient background",
            mood: "innovative, clean, futuristic blue accents",
        }
    } else {
        Scene {
            product: format!("professional product shot of {}", name),
            setting: "clean studio backdrop, soft commercial lighting",
            mood: if contains_any(&copy_text, &["luxury", "premium", "exclusive"]) {
                "luxurious, premium, rich tones"
            } else {
                "friendly, trustworthy, bright and optimistic"
            },
        }
    }
}

fn format_hint(ad_format: &str) -> &'static str {
    match ad_format {
        "instagram-story" => "vertical 9:16 composition",
        "instagram-post" | "facebook-feed" => "square social media composition",
        "google-display" | "banner" => "wide banner composition",
        _ => "balanced advertising composition",
    }
}

/// Build the text-to-image prompt from the form and the generated copy.
pub fn image_prompt(req: &AdRequest, copy: &AdCopy) -> String {
    let scene = pick_scene(req, copy);
    let mut prompt = format!(
        "{}, {}, {}, clear \"{}\" brand name on product label, {}, high quality commercial advertising photography",
        scene.product,
        scene.setting,
        scene.mood,
        req.product_name.trim(),
        format_hint(&req.ad_format),
    );

    if let Some(offer) = non_empty(req.special_offer.as_deref()) {
        prompt.push_str(&format!(", promotional badge reading \"{}\"", offer));
    }

    prompt
}

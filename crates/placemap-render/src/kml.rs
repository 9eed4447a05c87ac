//! KML 2.2 document for import into Google My Maps and similar tools.
//!
//! Placemarks are grouped into one folder per category and carry a
//! `Category`/`Address` data row so My Maps can style by column.

use std::fmt::Write;

use quick_xml::escape::escape;

use placemap_core::{Categories, Category, CategoryStyle, Listing};

use crate::error::RenderError;
use crate::maps_link;

const SCHEMA_ID: &str = "listing_schema";
const DESCRIPTION: &str = "Auto-generated from Google Sheets";

/// Render the full KML document.
pub fn render_kml(
    listings: &[Listing],
    categories: &Categories,
    document_name: &str,
) -> Result<String, RenderError> {
    let mut out = String::new();

    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(out, "<Document>")?;
    writeln!(out, "<name>{}</name>", escape(document_name))?;
    writeln!(out, "<description>{}</description>", DESCRIPTION)?;

    writeln!(out, r#"<Schema id="{}">"#, SCHEMA_ID)?;
    for field in ["Category", "Address"] {
        writeln!(
            out,
            r#"  <SimpleField type="string" name="{0}"><displayName>{0}</displayName></SimpleField>"#,
            field
        )?;
    }
    writeln!(out, "</Schema>")?;

    for (category, style) in categories.iter() {
        write_style(&mut out, category, style)?;
    }

    let mut placemarks = 0;
    for (category, style) in categories.iter() {
        let members: Vec<&Listing> = listings
            .iter()
            .filter(|l| l.category == category && l.is_located())
            .collect();
        if members.is_empty() {
            continue;
        }

        writeln!(out, "<Folder>")?;
        writeln!(out, "<name>{}</name>", escape(style.label.as_str()))?;
        for listing in members {
            write_placemark(&mut out, listing, category, style)?;
            placemarks += 1;
        }
        writeln!(out, "</Folder>")?;
    }

    writeln!(out, "</Document>")?;
    write!(out, "</kml>")?;

    tracing::debug!("Rendered {} placemarks to KML", placemarks);
    Ok(out)
}

fn write_style(out: &mut String, category: Category, style: &CategoryStyle) -> std::fmt::Result {
    writeln!(out, r#"<Style id="{}">"#, style_id(category))?;
    writeln!(out, "  <IconStyle>")?;
    writeln!(out, "    <color>{}</color>", kml_color(&style.color))?;
    writeln!(
        out,
        "    <Icon><href>{}</href></Icon>",
        escape(style.kml_icon.as_str())
    )?;
    writeln!(out, "  </IconStyle>")?;
    writeln!(out, "</Style>")
}

fn write_placemark(
    out: &mut String,
    listing: &Listing,
    category: Category,
    style: &CategoryStyle,
) -> std::fmt::Result {
    let Some(coords) = listing.coordinates else {
        return Ok(());
    };

    writeln!(out, "<Placemark>")?;
    writeln!(out, "  <name>{}</name>", escape(listing.name.as_str()))?;
    writeln!(out, "  <styleUrl>#{}</styleUrl>", style_id(category))?;
    writeln!(
        out,
        "  <description>{}</description>",
        cdata(&description(listing, style))
    )?;
    writeln!(
        out,
        r##"  <ExtendedData><SchemaData schemaUrl="#{}">"##,
        SCHEMA_ID
    )?;
    writeln!(
        out,
        r#"    <SimpleData name="Category">{}</SimpleData>"#,
        escape(style.label.as_str())
    )?;
    writeln!(
        out,
        r#"    <SimpleData name="Address">{}</SimpleData>"#,
        escape(listing.address.as_str())
    )?;
    writeln!(out, "  </SchemaData></ExtendedData>")?;
    writeln!(
        out,
        "  <Point><coordinates>{},{},0</coordinates></Point>",
        coords.lng, coords.lat
    )?;
    writeln!(out, "</Placemark>")
}

/// Balloon HTML: photo, type badge, summary, address, navigation link.
fn description(listing: &Listing, style: &CategoryStyle) -> String {
    let mut parts = Vec::new();

    if let Some(photo) = &listing.photo_url {
        parts.push(format!(r#"<img src="{}" width="300" />"#, escape(photo.as_str())));
    }

    let badge = if listing.type_text.is_empty() {
        &style.label
    } else {
        &listing.type_text
    };
    parts.push(format!(
        r#"<span style="background:{};color:#fff;padding:2px 8px;border-radius:10px;font-weight:600">{}</span>"#,
        escape(style.color.as_str()),
        escape(badge.as_str())
    ));

    if let Some(summary) = &listing.summary {
        parts.push(escape(summary.as_str()).into_owned());
    }
    parts.push(escape(listing.address.as_str()).into_owned());
    parts.push(format!(
        r#"<a href="{}">Open in Google Maps</a>"#,
        escape(maps_link(&listing.address))
    ));

    parts.join("<br/>")
}

fn style_id(category: Category) -> String {
    format!("cat-{}", category.key())
}

/// Wrap text in a CDATA section, splitting any `]]>` it contains.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// `#RRGGBB` to KML's opaque `ffBBGGRR`. Anything else maps to opaque white.
fn kml_color(hex: &str) -> String {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        tracing::warn!("Invalid category color {:?}, using white", hex);
        return "ffffffff".to_string();
    }
    let (r, g, b) = (&digits[0..2], &digits[2..4], &digits[4..6]);
    format!("ff{}{}{}", b, g, r).to_lowercase()
}

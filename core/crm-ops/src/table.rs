//! Human-readable table of every node, resource and operation.
//!
//! ```text
//! ========================================
//! node-a
//! ========================================
//!     > vip (ocf::heartbeat::IPaddr2) [start]
//!         * vip_last_0 Success (2023-11-14 22:15:00 UTC)
//! ```

use chrono::DateTime;
use cib_core::{CibModel, Operation, RcCode, Resource, ResourceStatus, Severity};
use owo_colors::OwoColorize;
use std::io::{self, Write};

const BANNER_WIDTH: usize = 40;
const RESOURCE_INDENT: usize = 4;
const OP_INDENT: usize = 8;

/// Colour choices for the table; a disabled palette emits plain text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn resource_id(&self, id: &str) -> String {
        if self.enabled {
            id.blue().to_string()
        } else {
            id.to_string()
        }
    }

    fn rc_code(&self, rc: RcCode) -> String {
        let label = rc.label();
        if !self.enabled {
            return label.to_string();
        }
        match rc.severity() {
            Severity::Running => label.bright_green().to_string(),
            Severity::NotRunning => label.bright_magenta().to_string(),
            Severity::Error => label.red().to_string(),
        }
    }

    fn status(&self, status: ResourceStatus) -> String {
        let token = status.as_str();
        if !self.enabled {
            return token.to_string();
        }
        match status {
            ResourceStatus::Start | ResourceStatus::Promote => token.bright_green().to_string(),
            ResourceStatus::Stop => token.bright_magenta().to_string(),
            ResourceStatus::Unknown => token.red().to_string(),
        }
    }
}

/// Writes the whole model, nodes and resources in identifier order, ops in
/// call-id order.
pub fn write_table<W: Write>(out: &mut W, model: &CibModel, palette: Palette) -> io::Result<()> {
    for node in model.nodes() {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(out, "{}\n{}\n{}", rule, node.id, rule)?;

        for resource in node.resources() {
            write_resource(out, resource, palette)?;
            for op in &resource.ops {
                write_op(out, op, palette)?;
            }
        }
    }
    Ok(())
}

fn write_resource<W: Write>(out: &mut W, resource: &Resource, palette: Palette) -> io::Result<()> {
    writeln!(
        out,
        "{:indent$}> {} ({}) [{}]",
        "",
        palette.resource_id(&resource.id),
        resource.agent(),
        palette.status(resource.status),
        indent = RESOURCE_INDENT
    )
}

fn write_op<W: Write>(out: &mut W, op: &Operation, palette: Palette) -> io::Result<()> {
    let rc = palette.rc_code(RcCode::parse(op.rc_code.as_deref()));
    match op.extra_attr("last-rc-change").and_then(format_epoch) {
        Some(changed) => writeln!(
            out,
            "{:indent$}* {} {} ({})",
            "",
            op.id,
            rc,
            changed,
            indent = OP_INDENT
        ),
        None => writeln!(out, "{:indent$}* {} {}", "", op.id, rc, indent = OP_INDENT),
    }
}

/// Renders a Unix timestamp attribute as UTC time.
fn format_epoch(value: &str) -> Option<String> {
    let secs = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cib_core::{decode, Document};

    fn render(xml: &str) -> String {
        let model = decode(&Document::parse(xml).unwrap());
        let mut out = Vec::new();
        write_table(&mut out, &model, Palette::new(false)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let text = render(
            r#"<cib>
              <lrm id="node-b"><lrm_resource id="web" class="ocf" provider="heartbeat" type="apache">
                <lrm_rsc_op id="web_monitor_0" operation="monitor" op-status="0" rc-code="7" call-id="2"/>
              </lrm_resource></lrm>
              <lrm id="node-a"><lrm_resource id="vip" class="ocf" provider="heartbeat" type="IPaddr2">
                <lrm_rsc_op id="vip_start_0" operation="start" op-status="0" rc-code="0" call-id="3"
                    last-rc-change="1700000100"/>
              </lrm_resource></lrm>
            </cib>"#,
        );

        let rule = "=".repeat(40);
        let expected = format!(
            "{rule}\nnode-a\n{rule}\n\
             \x20   > vip (ocf::heartbeat::IPaddr2) [start]\n\
             \x20       * vip_start_0 Success (2023-11-14 22:15:00 UTC)\n\
             {rule}\nnode-b\n{rule}\n\
             \x20   > web (ocf::heartbeat::apache) [stop]\n\
             \x20       * web_monitor_0 Not Running\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_missing_rc_code_is_unknown() {
        let text = render(r#"<lrm id="n"><lrm_resource id="r"><lrm_rsc_op id="op"/></lrm_resource></lrm>"#);
        assert!(text.contains("* op Unknown!"));
        assert!(text.contains("> r (::::) [?]"));
    }

    #[test]
    fn test_format_epoch() {
        assert_eq!(
            format_epoch("0").as_deref(),
            Some("1970-01-01 00:00:00 UTC")
        );
        assert_eq!(format_epoch("soon"), None);
    }

    #[test]
    fn test_colored_output_wraps_labels() {
        let palette = Palette::new(true);
        let painted = palette.rc_code(RcCode::Success);
        assert!(painted.contains("Success"));
        assert_ne!(painted, "Success");
    }
}

//! Decoding of the CIB resource-history (`lrm`) sections.
//!
//! ```text
//! <lrm id="node1">
//!   <lrm_resources>
//!     <lrm_resource id="ip" class="ocf" provider="heartbeat" type="IPaddr2">
//!       <lrm_rsc_op id="ip_start_0" operation="start" op-status="0" rc-code="0" call-id="4"/>
//!     </lrm_resource>
//!   </lrm_resources>
//! </lrm>
//! ```
//!
//! Elements of any of the three kinds without an `id` attribute are skipped
//! together with their subtree. Pacemaker can leave such partial elements
//! behind during reconfiguration.

use tracing::{debug, trace};

use crate::document::{Document, Element};
use crate::error::{CibError, Result};
use crate::model::{CibModel, Node, Operation, Resource};

pub const LRM_TAG: &str = "lrm";
pub const LRM_RESOURCE_TAG: &str = "lrm_resource";
pub const LRM_RSC_OP_TAG: &str = "lrm_rsc_op";

/// Decodes every `lrm` section of the document.
///
/// A document without any `lrm` section yields an empty model.
pub fn decode(document: &Document) -> CibModel {
    decode_sections(&document.elements_by_tag(LRM_TAG))
}

/// Like [`decode`], but a document without any `lrm` section is an error.
pub fn decode_strict(document: &Document) -> Result<CibModel> {
    let sections = document.elements_by_tag(LRM_TAG);
    if sections.is_empty() {
        return Err(CibError::NoLrmSections);
    }
    Ok(decode_sections(&sections))
}

fn decode_sections(sections: &[&Element]) -> CibModel {
    let mut model = CibModel::new();

    for section in sections {
        let Some(node_id) = section.attr("id") else {
            trace!("Skipping lrm section without id");
            continue;
        };
        let node = decode_node(node_id, section);
        trace!(node = node_id, resources = node.resources.len(), "Node");
        model.insert(node);
    }

    debug!(
        sections = sections.len(),
        nodes = model.len(),
        "Decoded lrm sections"
    );
    model
}

fn decode_node(node_id: &str, section: &Element) -> Node {
    let mut node = Node::new(node_id);

    for element in section.descendants_by_tag(LRM_RESOURCE_TAG) {
        let Some(resource_id) = element.attr("id") else {
            trace!(node = node_id, "Skipping lrm_resource without id");
            continue;
        };
        let resource = decode_resource(resource_id, element);
        trace!(
            node = node_id,
            resource = resource_id,
            status = %resource.status,
            "Resource"
        );
        node.insert(resource);
    }

    node
}

fn decode_resource(resource_id: &str, element: &Element) -> Resource {
    let ops = element
        .descendants_by_tag(LRM_RSC_OP_TAG)
        .into_iter()
        .filter_map(|op_element| {
            let Some(op_id) = op_element.attr("id") else {
                trace!(resource = resource_id, "Skipping lrm_rsc_op without id");
                return None;
            };
            trace!(resource = resource_id, op = op_id, "Op");
            Some(Operation::from_attributes(op_id, attributes(op_element)))
        })
        .collect();

    Resource::from_attributes(resource_id, attributes(element)).with_ops(ops)
}

fn attributes(element: &Element) -> impl Iterator<Item = (&str, &str)> {
    element
        .attributes
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ResourceStatus;

    fn parse(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_resource_without_ops_is_unknown() {
        let model = decode(&parse(
            r#"<cib><lrm id="n1"><lrm_resources>
                <lrm_resource id="r1" class="ocf" provider="pacemaker" type="Dummy"/>
            </lrm_resources></lrm></cib>"#,
        ));

        let resource = model.resource("n1", "r1").unwrap();
        assert_eq!(resource.status, ResourceStatus::Unknown);
        assert!(resource.ops.is_empty());
        assert_eq!(resource.agent(), "ocf::pacemaker::Dummy");
    }

    #[test]
    fn test_resource_without_id_is_skipped_but_siblings_decode() {
        let model = decode(&parse(
            r#"<cib><lrm id="n1"><lrm_resources>
                <lrm_resource class="ocf" type="Dummy">
                  <lrm_rsc_op id="orphan" operation="start" op-status="0" rc-code="0"/>
                </lrm_resource>
                <lrm_resource id="r2" class="ocf" type="Dummy"/>
            </lrm_resources></lrm></cib>"#,
        ));

        let node = model.node("n1").unwrap();
        assert_eq!(node.resources.len(), 1);
        assert!(node.resource("r2").is_ok());
    }

    #[test]
    fn test_lrm_without_id_is_skipped() {
        let model = decode(&parse(
            r#"<cib><lrm><lrm_resource id="r1"/></lrm><lrm id="n2"/></cib>"#,
        ));

        assert_eq!(model.len(), 1);
        assert!(model.node("n2").unwrap().resources.is_empty());
    }

    #[test]
    fn test_op_without_id_is_skipped() {
        let model = decode(&parse(
            r#"<lrm id="n1"><lrm_resource id="r1">
                <lrm_rsc_op operation="start" op-status="0" rc-code="0" call-id="2"/>
                <lrm_rsc_op id="r1_stop" operation="stop" op-status="0" rc-code="0" call-id="1"/>
            </lrm_resource></lrm>"#,
        ));

        let resource = model.resource("n1", "r1").unwrap();
        assert_eq!(resource.ops.len(), 1);
        assert_eq!(resource.status, ResourceStatus::Stop);
    }

    #[test]
    fn test_ops_are_sorted_before_classification() {
        let model = decode(&parse(
            r#"<lrm id="n1"><lrm_resource id="r1">
                <lrm_rsc_op id="r1_stop" operation="stop" op-status="0" rc-code="0" call-id="3"/>
                <lrm_rsc_op id="r1_start" operation="start" op-status="0" rc-code="0" call-id="2"/>
            </lrm_resource></lrm>"#,
        ));

        let resource = model.resource("n1", "r1").unwrap();
        let ids: Vec<_> = resource.ops.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["r1_start", "r1_stop"]);
        assert_eq!(resource.status, ResourceStatus::Stop);
    }

    #[test]
    fn test_attributes_are_copied_verbatim() {
        let model = decode(&parse(
            r#"<lrm id="n1"><lrm_resource id="r1" class="stonith" type="fence_xvm" container="c1">
                <lrm_rsc_op id="r1_monitor_60000" operation="monitor" op-status="0"
                    rc-code="0" call-id="7" interval="60000" exec-time="12"/>
            </lrm_resource></lrm>"#,
        ));

        let resource = model.resource("n1", "r1").unwrap();
        assert_eq!(resource.class.as_deref(), Some("stonith"));
        assert_eq!(resource.provider, None);
        assert_eq!(resource.extra.get("container").map(String::as_str), Some("c1"));

        let op = &resource.ops[0];
        assert_eq!(op.extra_attr("interval"), Some("60000"));
        assert_eq!(op.extra_attr("exec-time"), Some("12"));
    }

    #[test]
    fn test_no_lrm_sections() {
        let doc = parse(r#"<cib><configuration/></cib>"#);
        assert!(decode(&doc).is_empty());
        assert!(matches!(decode_strict(&doc), Err(CibError::NoLrmSections)));
    }

    #[test]
    fn test_duplicate_node_id_keeps_last() {
        let model = decode(&parse(
            r#"<cib><lrm id="n1"><lrm_resource id="a"/></lrm><lrm id="n1"><lrm_resource id="b"/></lrm></cib>"#,
        ));

        let node = model.node("n1").unwrap();
        assert!(node.resource("b").is_ok());
        assert!(node.resource("a").is_err());
    }
}

use crate::error::Result;
use crate::object::kvlm::Kvlm;
use crate::oid::Oid;

/// An annotated tag: KVLM with `object`, `type`, `tag`, `tagger`, plus
/// message. Lightweight tags are plain refs and never produce a `Tag`
/// object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kvlm: Kvlm,
}

impl Tag {
    pub fn parse(data: &[u8]) -> Result<Tag> {
        Ok(Tag {
            kvlm: Kvlm::parse(data),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    pub fn object(&self) -> Option<Oid> {
        self.kvlm.get("object").and_then(|s| Oid::from_hex(s).ok())
    }

    pub fn target_type(&self) -> Option<&str> {
        self.kvlm.get("type")
    }

    pub fn name(&self) -> Option<&str> {
        self.kvlm.get("tag")
    }

    pub fn build(object: Oid, target_type: &str, name: &str, tagger_line: &str, message: &str) -> Tag {
        let mut kvlm = Kvlm::new();
        kvlm.append("object", object.to_hex());
        kvlm.append("type", target_type);
        kvlm.append("tag", name);
        kvlm.append("tagger", tagger_line);
        kvlm.message = message.to_string();
        Tag { kvlm }
    }
}

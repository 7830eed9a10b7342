/// A blob: opaque bytes, verbatim file content. No parsing beyond
/// taking ownership of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn parse(data: &[u8]) -> Blob {
        Blob {
            data: data.to_vec(),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }
}

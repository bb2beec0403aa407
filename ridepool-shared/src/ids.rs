use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Kinds of generated record ids. Each kind has its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordId {
    Trip,
    Reservation,
}

impl RecordId {
    pub fn prefix(self) -> &'static str {
        match self {
            RecordId::Trip => "t_",
            RecordId::Reservation => "r_",
        }
    }

    /// Prefix followed by seven random lowercase base-36 characters, e.g. `t_k3z09qa`.
    pub fn generate(self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{}{}", self.prefix(), suffix)
    }

    /// Generates ids until `taken` reports one as free.
    pub fn generate_unique<F>(self, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let id = self.generate();
            if !taken(&id) {
                return id;
            }
        }
    }
}

use std::fmt;

/// The `<?xml ...?>` prolog.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    version: &'a str,
    encoding: &'a str,
    standalone: Option<bool>,
}

impl<'a> Declaration<'a> {
    pub fn new(version: &'a str, encoding: &'a str) -> Self {
        Declaration {
            version,
            encoding,
            standalone: None,
        }
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = Some(standalone);
        self
    }

    pub fn write<W: std::io::Write>(&self, w: &mut W) -> Result<(), super::XmlBuilderError> {
        write!(w, "{self}")?;
        Ok(())
    }
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<?xml version="{}" encoding="{}""#,
            self.version, self.encoding
        )?;
        if let Some(standalone) = self.standalone {
            write!(
                f,
                r#" standalone="{}""#,
                if standalone { "yes" } else { "no" }
            )?;
        }
        write!(f, "?>")
    }
}

use ferrum_validation::terminology::{ALL_LANG_VALUE_SET_URL, BCP_47_URN};
use ferrum_validation::{Binding, Constraint, ValidationRun};

use crate::node::FieldSink;
use crate::primitive::{Base64Binary, Code, DateTime, FhirString, UnsignedInt, Url};

const ATT_1: Constraint = Constraint::rule(
    "att-1",
    "Attachment",
    "If the Attachment has data, it SHALL have a contentType",
    "data.empty() or contentType.exists()",
);

const LANGUAGE_BINDING: Binding = Binding::new(ALL_LANG_VALUE_SET_URL, BCP_47_URN, &[]);

fhir_node! {
    /// Content in a format defined elsewhere, inline or by URL.
    Attachment, AttachmentBuilder, element, "Attachment";
    one {
        /// Mime type of the content, with charset etc.
        content_type: Code,
        language: Code,
        /// Inline data, base64 encoded.
        data: Base64Binary,
        url: Url,
        size: UnsignedInt,
        /// SHA-1 of the data, base64 encoded.
        hash: Base64Binary,
        title: FhirString,
        creation: DateTime,
    }
    many {}
    choice {}
}

impl Attachment {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("contentType", self.content_type.as_ref());
        sink.one("language", self.language.as_ref());
        sink.one("data", self.data.as_ref());
        sink.one("url", self.url.as_ref());
        sink.one("size", self.size.as_ref());
        sink.one("hash", self.hash.as_ref());
        sink.one("title", self.title.as_ref());
        sink.one("creation", self.creation.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        if let Some(language) = &self.language {
            run.check_code_binding(
                "language",
                &LANGUAGE_BINDING,
                language.as_str(),
                language.has_only_data_absent_reason(),
            );
        }
        let has_data = self.data.is_some();
        let has_content_type = self.content_type.is_some();
        run.constraint(&ATT_1, || !has_data || has_content_type);
    }
}

use ferrum_validation::ValidationRun;

use crate::base::is_meaningful;
use crate::codes::NarrativeStatus;
use crate::datatypes::Coding;
use crate::node::FieldSink;
use crate::primitive::{Canonical, FhirId, Instant, Uri, Xhtml};

fhir_node! {
    /// Metadata about a resource maintained by the infrastructure.
    Meta, MetaBuilder, element, "Meta";
    one {
        version_id: FhirId,
        last_updated: Instant,
        /// Identifies where the resource comes from.
        source: Uri,
    }
    many {
        profile / set_profile: Canonical,
        /// Security labels applied to this resource.
        security / set_security: Coding,
        tag / set_tag: Coding,
    }
    choice {}
}

impl Meta {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("versionId", self.version_id.as_ref());
        sink.one("lastUpdated", self.last_updated.as_ref());
        sink.one("source", self.source.as_ref());
        sink.many("profile", &self.profile);
        sink.many("security", &self.security);
        sink.many("tag", &self.tag);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("profile", &self.profile, is_meaningful);
        run.check_list("security", &self.security, is_meaningful);
        run.check_list("tag", &self.tag, is_meaningful);
    }
}

fhir_node! {
    /// Human-readable summary of a resource.
    Narrative, NarrativeBuilder, element, "Narrative";
    one {
        status: NarrativeStatus,
        /// Limited xhtml content.
        div: Xhtml,
    }
    many {}
    choice {}
}

impl Narrative {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("status", self.status.as_ref());
        sink.one("div", self.div.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.require("status", &self.status);
        run.require("div", &self.div);
    }
}

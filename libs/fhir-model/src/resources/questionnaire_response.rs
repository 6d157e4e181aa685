use ferrum_validation::{Constraint, ValidationRun};

use crate::base::is_meaningful;
use crate::choice::AnswerValue;
use crate::codes::QuestionnaireResponseStatus;
use crate::datatypes::{Identifier, Reference};
use crate::node::FieldSink;
use crate::primitive::{Canonical, DateTime, FhirString, Uri};
use crate::validation::{check_reference, check_references};

const QRS_1: Constraint = Constraint::rule(
    "qrs-1",
    "QuestionnaireResponse.item",
    "Nested item can't be beneath both item and answer",
    "(answer.exists() and item.exists()).not()",
);

fhir_node! {
    /// A structured set of questions and their answers.
    ///
    /// Items are grouped and ordered the way the questionnaire that was
    /// answered defines them.
    QuestionnaireResponse, QuestionnaireResponseBuilder, domain_resource, "QuestionnaireResponse";
    one {
        /// Unique id for this set of answers.
        identifier: Identifier,
        /// Form being answered.
        questionnaire: Canonical,
        status: QuestionnaireResponseStatus,
        /// The subject of the questions.
        subject: Reference,
        encounter: Reference,
        /// Date the answers were gathered.
        authored: DateTime,
        author: Reference,
        /// The person who answered the questions.
        source: Reference,
    }
    many {
        based_on / set_based_on: Reference,
        part_of / set_part_of: Reference,
        item / set_item: QuestionnaireResponseItem,
    }
    choice {}
}

impl QuestionnaireResponse {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("identifier", self.identifier.as_ref());
        sink.many("basedOn", &self.based_on);
        sink.many("partOf", &self.part_of);
        sink.one("questionnaire", self.questionnaire.as_ref());
        sink.one("status", self.status.as_ref());
        sink.one("subject", self.subject.as_ref());
        sink.one("encounter", self.encounter.as_ref());
        sink.one("authored", self.authored.as_ref());
        sink.one("author", self.author.as_ref());
        sink.one("source", self.source.as_ref());
        sink.many("item", &self.item);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("basedOn", &self.based_on, is_meaningful);
        run.check_list("partOf", &self.part_of, is_meaningful);
        run.require("status", &self.status);
        run.check_list("item", &self.item, is_meaningful);
        check_references(run, "basedOn", &self.based_on, &["CarePlan", "ServiceRequest"]);
        check_references(run, "partOf", &self.part_of, &["Observation", "Procedure"]);
        check_reference(run, "encounter", self.encounter.as_ref(), &["Encounter"]);
        check_reference(
            run,
            "author",
            self.author.as_ref(),
            &[
                "Device",
                "Practitioner",
                "PractitionerRole",
                "Patient",
                "RelatedPerson",
                "Organization",
            ],
        );
        check_reference(
            run,
            "source",
            self.source.as_ref(),
            &["Patient", "Practitioner", "PractitionerRole", "RelatedPerson"],
        );
    }
}

fhir_node! {
    /// A group or question item from the original questionnaire.
    QuestionnaireResponseItem, QuestionnaireResponseItemBuilder, backbone,
        "QuestionnaireResponse.Item";
    one {
        /// Pointer to the specific item of the questionnaire.
        link_id: FhirString,
        definition: Uri,
        /// Name for group or question text.
        text: FhirString,
    }
    many {
        answer / set_answer: QuestionnaireResponseItemAnswer,
        /// Nested questionnaire response items.
        item / set_item: QuestionnaireResponseItem,
    }
    choice {}
}

impl QuestionnaireResponseItem {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("linkId", self.link_id.as_ref());
        sink.one("definition", self.definition.as_ref());
        sink.one("text", self.text.as_ref());
        sink.many("answer", &self.answer);
        sink.many("item", &self.item);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.require("linkId", &self.link_id);
        run.check_list("answer", &self.answer, is_meaningful);
        run.check_list("item", &self.item, is_meaningful);
        let has_answer = !self.answer.is_empty();
        let has_item = !self.item.is_empty();
        run.constraint(&QRS_1, || !(has_answer && has_item));
    }
}

fhir_node! {
    /// The response(s) to the question.
    QuestionnaireResponseItemAnswer, QuestionnaireResponseItemAnswerBuilder, backbone,
        "QuestionnaireResponse.Item.Answer";
    one {}
    many {
        /// Nested groups and questions.
        item / set_item: QuestionnaireResponseItem,
    }
    choice {
        value("value"): AnswerValue,
    }
}

impl QuestionnaireResponseItemAnswer {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("value", self.value.as_ref());
        sink.many("item", &self.item);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_choice("value");
        run.check_list("item", &self.item, is_meaningful);
    }
}

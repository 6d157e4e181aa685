use ferrum_validation::{Binding, ValidationRun};

use crate::base::is_meaningful;
use crate::choice::{CodeableConceptOrReference, DateTimeOrPeriodOrTiming};
use crate::codes::SupplyDeliveryStatus;
use crate::datatypes::{CodeableConcept, Identifier, Quantity, Reference};
use crate::node::FieldSink;
use crate::validation::{check_concept_binding, check_reference, check_references};

const SUPPLY_DELIVERY_TYPE: Binding = Binding::new(
    "http://hl7.org/fhir/ValueSet/supplydelivery-type",
    "http://terminology.hl7.org/CodeSystem/supply-item-type",
    &["medication", "device"],
);

fhir_node! {
    /// Record of delivery of what is supplied.
    SupplyDelivery, SupplyDeliveryBuilder, domain_resource, "SupplyDelivery";
    one {
        status: SupplyDeliveryStatus,
        /// Patient for whom the item is supplied.
        patient: Reference,
        /// Category of dispense event.
        type_: CodeableConcept,
        supplied_item: SupplyDeliverySuppliedItem,
        /// Dispenser.
        supplier: Reference,
        /// Where the supply was sent.
        destination: Reference,
    }
    many {
        identifier / set_identifier: Identifier,
        based_on / set_based_on: Reference,
        part_of / set_part_of: Reference,
        /// Who collected the supply.
        receiver / set_receiver: Reference,
    }
    choice {
        /// Handover time.
        occurrence("occurrence"): DateTimeOrPeriodOrTiming,
    }
}

impl SupplyDelivery {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.many("identifier", &self.identifier);
        sink.many("basedOn", &self.based_on);
        sink.many("partOf", &self.part_of);
        sink.one("status", self.status.as_ref());
        sink.one("patient", self.patient.as_ref());
        sink.one("type", self.type_.as_ref());
        sink.one("suppliedItem", self.supplied_item.as_ref());
        sink.one("occurrence", self.occurrence.as_ref());
        sink.one("supplier", self.supplier.as_ref());
        sink.one("destination", self.destination.as_ref());
        sink.many("receiver", &self.receiver);
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.check_list("identifier", &self.identifier, is_meaningful);
        run.check_list("basedOn", &self.based_on, is_meaningful);
        run.check_list("partOf", &self.part_of, is_meaningful);
        run.check_choice("occurrence");
        run.check_list("receiver", &self.receiver, is_meaningful);
        check_concept_binding(run, "type", &SUPPLY_DELIVERY_TYPE, self.type_.as_ref());
        check_references(run, "basedOn", &self.based_on, &["SupplyRequest"]);
        check_references(run, "partOf", &self.part_of, &["SupplyDelivery", "Contract"]);
        check_reference(run, "patient", self.patient.as_ref(), &["Patient"]);
        check_reference(
            run,
            "supplier",
            self.supplier.as_ref(),
            &["Practitioner", "PractitionerRole", "Organization"],
        );
        check_reference(run, "destination", self.destination.as_ref(), &["Location"]);
        check_references(
            run,
            "receiver",
            &self.receiver,
            &["Practitioner", "PractitionerRole"],
        );
    }
}

fhir_node! {
    /// The item that was delivered.
    SupplyDeliverySuppliedItem, SupplyDeliverySuppliedItemBuilder, backbone,
        "SupplyDelivery.SuppliedItem";
    one {
        /// Amount dispensed.
        quantity: Quantity,
    }
    many {}
    choice {
        /// Medication, substance or device supplied.
        item("item"): CodeableConceptOrReference,
    }
}

impl SupplyDeliverySuppliedItem {
    fn own_fields<'a, S: FieldSink<'a>>(&'a self, sink: &mut S) {
        sink.one("quantity", self.quantity.as_ref());
        sink.one("item", self.item.as_ref());
    }

    fn rules(&self, run: &mut ValidationRun<'_>) {
        run.prohibited(
            "quantity.comparator",
            self.quantity.as_ref().map_or(false, |q| q.comparator().is_some()),
        );
        run.check_choice("item");
        check_reference(
            run,
            "item",
            self.item.as_ref().and_then(CodeableConceptOrReference::as_reference),
            &["Medication", "Substance", "Device"],
        );
    }
}
